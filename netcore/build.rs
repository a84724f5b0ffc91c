//! netcore 构建脚本
//!
//! 这个脚本在编译前运行，负责：
//! 1. 解析工作区根目录的 Net.toml 配置文件
//! 2. 生成 src/config.rs 配置代码

use std::env;
use std::fs;
use std::path::PathBuf;

/// 读取 `[section] key` 整数配置，缺省时使用默认值
fn get_integer(config: &toml::Value, section: &str, key: &str, default: i64) -> i64 {
    config.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .unwrap_or(default)
}

/// 读取 `[section] key` 字符串配置，缺省时使用默认值
fn get_str<'a>(config: &'a toml::Value, section: &str, key: &str, default: &'a str) -> &'a str {
    config.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or(default)
}

fn main() {
    println!("cargo:rerun-if-changed=../Net.toml");
    println!("cargo:rerun-if-changed=build.rs");

    // 没有配置文件时全部使用默认值
    let config: toml::Value = match fs::read_to_string("../Net.toml") {
        Ok(content) => toml::from_str(&content).expect("Net.toml 解析失败"),
        Err(_) => {
            println!("cargo:warning=Net.toml not found, using built-in defaults");
            toml::Value::Table(toml::map::Map::new())
        }
    };

    let align = get_integer(&config, "buffer", "align", 16);
    if align <= 0 || (align & (align - 1)) != 0 {
        panic!("[buffer] align 必须是 2 的幂，当前值 {}", align);
    }

    generate_config_code(&config, align);
}

fn generate_config_code(config: &toml::Value, align: i64) {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    let config_code = format!(
        r#"//! netcore 配置（自动生成）
//!
//! 此文件由 build.rs 根据 Net.toml 自动生成，请勿手动修改

// ============================================================
// 基本信息
// ============================================================

/// 协议栈名称
pub const NETCORE_NAME: &str = "{}";

/// 协议栈版本
pub const NETCORE_VERSION: &str = "{}";

// ============================================================
// 网络设备配置
// ============================================================

/// 设备名前缀
pub const NETDEV_NAME_PREFIX: &str = "{}";

/// 发送队列初始容量
pub const NETDEV_TX_QUEUE_LEN: usize = {};

/// 接收队列初始容量
pub const NETDEV_RX_QUEUE_LEN: usize = {};

// ============================================================
// 缓冲区配置
// ============================================================

/// SkBuff 预留头部空间（字节）
pub const NET_SKB_PAD: usize = {};

/// SkBuff 数据区对齐
pub const NET_SKB_ALIGN: usize = {};

// ============================================================
// 以太网配置
// ============================================================

/// 以太网 MTU
pub const ETH_MTU: usize = {};
"#,
        get_str(config, "general", "name", "netcore"),
        get_str(config, "general", "version", "0.1.0"),
        get_str(config, "netdev", "name_prefix", "net"),
        get_integer(config, "netdev", "tx_queue_len", 32),
        get_integer(config, "netdev", "rx_queue_len", 32),
        get_integer(config, "buffer", "headroom", 32),
        align,
        get_integer(config, "ethernet", "mtu", 1500),
    );

    let config_file = manifest_dir.join("src").join("config.rs");

    // 只有内容变化时才写入，避免每次编译都更新文件时间戳
    let existing_content = fs::read_to_string(&config_file).unwrap_or_default();
    if existing_content != config_code {
        fs::write(&config_file, &config_code)
            .expect("写入配置文件失败");
    }
}
