//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 网络子系统
//!
//! 参考: net/

pub mod buffer;
pub mod protocol;
pub mod ethernet;
pub mod dev;
pub mod stack;

pub use buffer::{SkBuff, PacketType, alloc_skb, kfree_skb};
pub use protocol::{LlAddr, LlProtocol, NetProtocol, ProtocolTable};
pub use dev::{net_rx, net_tx};
pub use stack::NetStack;
