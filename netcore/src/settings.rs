//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 配置存储
//!
//! 每个网络设备拥有一个以设备名为键的配置块，注册设备时挂到根配置下，
//! 注销设备时摘除。配置值为原始字节，按名称存取。

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::errno::{Errno, Result};

/// 配置块
#[derive(Debug, Default)]
pub struct Settings {
    /// 配置块名称 (设备名)
    name: String,
    /// 配置项
    values: BTreeMap<String, Vec<u8>>,
}

/// 共享的配置块引用
pub type SettingsRef = Rc<RefCell<Settings>>;

impl Settings {
    /// 创建空的、未命名的配置块
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        self.name.push_str(name);
    }

    /// 写入配置项，覆盖旧值
    pub fn store(&mut self, key: &str, value: &[u8]) {
        self.values.insert(key.to_string(), value.to_vec());
    }

    /// 读取配置项
    pub fn fetch(&self, key: &str) -> Option<&[u8]> {
        self.values.get(key).map(|v| v.as_slice())
    }

    /// 读取字符串配置项，非 UTF-8 时返回 None
    pub fn fetch_str(&self, key: &str) -> Option<&str> {
        self.fetch(key).and_then(|v| core::str::from_utf8(v).ok())
    }

    /// 删除配置项
    pub fn clear(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 根配置
///
/// 保存已注册配置块的引用，名称唯一
#[derive(Debug, Default)]
pub struct SettingsRoot {
    children: Vec<SettingsRef>,
}

impl SettingsRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册配置块
    ///
    /// # 返回
    /// - 名称为空: EINVAL
    /// - 同名配置块已注册: EEXIST
    pub fn register(&mut self, settings: &SettingsRef) -> Result<()> {
        let name = settings.borrow().name().to_string();
        if name.is_empty() {
            return Err(Errno::InvalidArgument);
        }
        if self.find(&name).is_some() {
            log::warn!("settings: {} already registered", name);
            return Err(Errno::FileExists);
        }

        log::debug!("settings: registered {}", name);
        self.children.push(Rc::clone(settings));
        Ok(())
    }

    /// 注销配置块
    ///
    /// 未注册时什么也不做
    pub fn unregister(&mut self, settings: &SettingsRef) {
        if let Some(pos) = self.children.iter().position(|s| Rc::ptr_eq(s, settings)) {
            let removed = self.children.remove(pos);
            log::debug!("settings: unregistered {}", removed.borrow().name());
        }
    }

    /// 按名称查找
    pub fn find(&self, name: &str) -> Option<SettingsRef> {
        self.children
            .iter()
            .find(|s| s.borrow().name() == name)
            .map(Rc::clone)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
