//! netcore 配置（自动生成）
//!
//! 此文件由 build.rs 根据 Net.toml 自动生成，请勿手动修改

// ============================================================
// 基本信息
// ============================================================

/// 协议栈名称
pub const NETCORE_NAME: &str = "netcore";

/// 协议栈版本
pub const NETCORE_VERSION: &str = "0.1.0";

// ============================================================
// 网络设备配置
// ============================================================

/// 设备名前缀
pub const NETDEV_NAME_PREFIX: &str = "net";

/// 发送队列初始容量
pub const NETDEV_TX_QUEUE_LEN: usize = 32;

/// 接收队列初始容量
pub const NETDEV_RX_QUEUE_LEN: usize = 32;

// ============================================================
// 缓冲区配置
// ============================================================

/// SkBuff 预留头部空间（字节）
pub const NET_SKB_PAD: usize = 32;

/// SkBuff 数据区对齐
pub const NET_SKB_ALIGN: usize = 16;

// ============================================================
// 以太网配置
// ============================================================

/// 以太网 MTU
pub const ETH_MTU: usize = 1500;
