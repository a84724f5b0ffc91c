//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络设备注册表
//!
//! 参考: net/core/dev.c (register_netdevice, unregister_netdevice)

use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::config::NETDEV_NAME_PREFIX;
use crate::drivers::device::BusType;
use crate::drivers::net::space::{netdev_get, NetDeviceRef, IFNAMSIZ};
use crate::errno::{Errno, Result};
use crate::settings::SettingsRoot;

/// 已注册的网络设备列表
///
/// 保持注册顺序；列表持有每个设备的一个引用
#[derive(Debug, Default)]
pub struct NetDeviceList {
    devices: Vec<NetDeviceRef>,
    /// 下一个设备索引，只增不减
    next_ifindex: u32,
}

impl NetDeviceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册网络设备
    ///
    /// # 说明
    /// - 设备名为 `NETDEV_NAME_PREFIX` 加索引，索引在失败时也会消耗
    /// - 设备的配置块以设备名注册到 `settings`，失败时设备名和列表保持不变
    /// - 已注册的设备返回 EEXIST
    pub fn register(&mut self, netdev: &NetDeviceRef, settings: &mut SettingsRoot) -> Result<()> {
        if self.devices.iter().any(|d| Rc::ptr_eq(d, netdev)) {
            log::warn!("netdev {}: already registered", netdev.borrow().name());
            return Err(Errno::FileExists);
        }

        let ifindex = self.next_ifindex;
        self.next_ifindex += 1;

        let name = format!("{}{}", NETDEV_NAME_PREFIX, ifindex);
        if name.len() >= IFNAMSIZ {
            return Err(Errno::InvalidArgument);
        }

        let (old_name, old_ifindex) = {
            let mut dev = netdev.borrow_mut();
            let old_name = core::mem::replace(&mut dev.name, name);
            let old_ifindex = core::mem::replace(&mut dev.ifindex, ifindex);
            dev.settings().borrow_mut().set_name(&dev.name);
            (old_name, old_ifindex)
        };

        let dev_settings = Rc::clone(netdev.borrow().settings());
        if let Err(err) = settings.register(&dev_settings) {
            log::debug!("netdev {}: could not register settings: {}", netdev.borrow().name(), err);
            let mut dev = netdev.borrow_mut();
            dev.settings().borrow_mut().set_name(&old_name);
            dev.name = old_name;
            dev.ifindex = old_ifindex;
            return Err(err);
        }

        {
            let dev = netdev.borrow();
            let phys = dev.dev().map(|d| d.name.as_str()).unwrap_or("(none)");
            log::debug!("netdev {}: registered (phys {} hwaddr {})", dev.name(), phys, dev.hwaddr());
        }

        self.devices.push(netdev_get(netdev));
        Ok(())
    }

    /// 注销网络设备
    ///
    /// 先关闭设备，再摘除配置块，最后释放列表持有的引用。
    /// 未注册的设备只会被关闭。
    pub fn unregister(&mut self, netdev: &NetDeviceRef, settings: &mut SettingsRoot) {
        netdev.borrow_mut().close();

        let dev_settings = Rc::clone(netdev.borrow().settings());
        settings.unregister(&dev_settings);

        if let Some(pos) = self.devices.iter().position(|d| Rc::ptr_eq(d, netdev)) {
            let removed = self.devices.remove(pos);
            log::debug!("netdev {}: unregistered", removed.borrow().name());
        }
    }

    /// 按设备名查找
    pub fn find(&self, name: &str) -> Option<NetDeviceRef> {
        self.devices
            .iter()
            .find(|d| d.borrow().name() == name)
            .map(netdev_get)
    }

    /// 按总线位置查找
    ///
    /// 没有绑定总线设备的网络设备不会匹配
    pub fn find_by_location(&self, bus_type: BusType, location: u32) -> Option<NetDeviceRef> {
        self.devices
            .iter()
            .find(|d| {
                d.borrow()
                    .dev()
                    .map(|bus| bus.desc.bus_type == bus_type && bus.desc.location == location)
                    .unwrap_or(false)
            })
            .map(netdev_get)
    }

    /// 按注册顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &NetDeviceRef> + '_ {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
