//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络缓冲区 (SkBuff)
//!
//! 参考: include/linux/skbuff.h
//!
//! # 所有权
//! SkBuff 不可复制，任一时刻只有一个持有者：生产者、某个队列或消费者。
//! 放入队列即转移所有权，取出队列即取回所有权；释放（drop）恰好发生一次。

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::config::{NET_SKB_ALIGN, NET_SKB_PAD};

/// 数据包类型
///
/// 对应 Linux 的 PACKET_* (include/uapi/linux/if_packet.h)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// 发送到本机的包
    Host,
    /// 发送到其他主机的包
    Otherhost,
    /// 广播包
    Broadcast,
    /// 多播包
    Multicast,
}

/// 释放回调
///
/// 对应 Linux 的 skb->destructor，在缓冲区释放时恰好调用一次
pub type SkbDestructor = Box<dyn FnOnce(&SkBuff)>;

/// 网络缓冲区 (SkBuff)
///
/// # 内存布局
/// ```text
/// |<- headroom ->|<- data (len) ->|<- tailroom ->|
/// 0             data            tail          end
/// ```
pub struct SkBuff {
    /// 底层存储 (head..end)
    buf: Vec<u8>,
    /// 当前协议层数据起始偏移
    data: usize,
    /// 数据结束偏移
    tail: usize,
    /// 协议类型 (链路层类型字段)
    pub protocol: u16,
    /// 数据包类型
    pub pkt_type: PacketType,
    /// 释放回调
    destructor: Option<SkbDestructor>,
}

impl SkBuff {
    /// 分配新的 SkBuff
    ///
    /// # 参数
    /// - `size`: 数据大小（字节数）
    ///
    /// # 返回
    /// 返回分配的 SkBuff，如果分配失败则返回 None
    ///
    /// # 说明
    /// - 数据区大小向上对齐到 `NET_SKB_ALIGN`
    /// - 预留 `NET_SKB_PAD` 字节 headroom 用于添加协议头（链路层等）
    pub fn alloc(size: usize) -> Option<Self> {
        let data_size = size.checked_add(NET_SKB_ALIGN - 1)? & !(NET_SKB_ALIGN - 1);
        let alloc_size = NET_SKB_PAD.checked_add(data_size.max(NET_SKB_ALIGN))?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(alloc_size).ok()?;
        buf.resize(alloc_size, 0);

        Some(SkBuff {
            buf,
            data: NET_SKB_PAD,
            tail: NET_SKB_PAD,
            protocol: 0,
            pkt_type: PacketType::Host,
            destructor: None,
        })
    }

    /// 分配 SkBuff 并复制数据
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        let mut skb = Self::alloc(data.len())?;
        skb.put_data(data).ok()?;
        Some(skb)
    }

    /// 设置释放回调
    ///
    /// 已存在的回调会被替换（不会被调用）
    pub fn set_destructor<F>(&mut self, destructor: F)
    where
        F: FnOnce(&SkBuff) + 'static,
    {
        self.destructor = Some(Box::new(destructor));
    }

    /// 在数据尾部添加数据
    ///
    /// # 返回
    /// 返回新增区域的可变切片，如果空间不足则返回 None
    pub fn put(&mut self, len: usize) -> Option<&mut [u8]> {
        if len > self.tailroom() {
            return None;
        }

        let start = self.tail;
        self.tail += len;
        Some(&mut self.buf[start..self.tail])
    }

    /// 写入数据到 tail 位置
    ///
    /// # 说明
    /// - 先调用 put 获取空间
    /// - 然后复制数据到该空间
    pub fn put_data(&mut self, data: &[u8]) -> Result<(), ()> {
        let area = self.put(data.len()).ok_or(())?;
        area.copy_from_slice(data);
        Ok(())
    }

    /// 在数据头部添加数据
    ///
    /// # 返回
    /// 返回新头部区域的可变切片，如果 headroom 不足则返回 None
    pub fn push(&mut self, len: usize) -> Option<&mut [u8]> {
        if len > self.headroom() {
            return None;
        }

        self.data -= len;
        Some(&mut self.buf[self.data..self.data + len])
    }

    /// 从数据头部移除数据
    ///
    /// # 返回
    /// 返回移除后剩余的数据，如果长度不足则返回 None
    pub fn pull(&mut self, len: usize) -> Option<&[u8]> {
        if len > self.len() {
            return None;
        }

        self.data += len;
        Some(&self.buf[self.data..self.tail])
    }

    /// 头部可用空间
    pub fn headroom(&self) -> usize {
        self.data
    }

    /// 尾部可用空间
    pub fn tailroom(&self) -> usize {
        self.buf.len() - self.tail
    }

    /// 获取数据
    pub fn data(&self) -> &[u8] {
        &self.buf[self.data..self.tail]
    }

    /// 获取可变数据
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.data..self.tail]
    }

    /// 获取数据长度
    pub fn len(&self) -> usize {
        self.tail - self.data
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.tail == self.data
    }

    /// 复制 SkBuff 数据
    ///
    /// # 返回
    /// 返回实际复制的字节数
    pub fn copy_bits(&self, offset: usize, buf: &mut [u8]) -> usize {
        if offset > self.len() {
            return 0;
        }

        let copy_len = core::cmp::min(buf.len(), self.len() - offset);
        let start = self.data + offset;
        buf[..copy_len].copy_from_slice(&self.buf[start..start + copy_len]);
        copy_len
    }
}

impl Drop for SkBuff {
    fn drop(&mut self) {
        if let Some(destructor) = self.destructor.take() {
            destructor(&*self);
        }
    }
}

impl fmt::Debug for SkBuff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkBuff")
            .field("len", &self.len())
            .field("headroom", &self.headroom())
            .field("tailroom", &self.tailroom())
            .field("protocol", &format_args!("{:#06x}", self.protocol))
            .finish()
    }
}

/// 分配 SkBuff 的辅助函数
pub fn alloc_skb(size: usize) -> Option<SkBuff> {
    SkBuff::alloc(size)
}

/// 释放 SkBuff 的辅助函数
///
/// 与直接 drop 等价，用于在调用处显式标明“丢弃”
pub fn kfree_skb(skb: SkBuff) {
    log::trace!("skb: freeing {:?}", skb);
    drop(skb);
}
