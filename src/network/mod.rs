//! # 网络模块
//!
//! 这个模块包含所有与网络通信相关的功能：
//!
//! - HTTP会话管理
//! - 单个资源下载与失败隔离
//! - 并发资源下载调度
//!
//! # 模块组织
//!
//! - `session` - HTTP传输抽象及基于reqwest的实现
//! - `fetcher` - 下载单个资源，失败只记录日志
//! - `orchestrator` - 并发下载全部资源并汇总结果

pub mod fetcher;
pub mod orchestrator;
pub mod session;

// Re-export commonly used items for convenience
pub use fetcher::fetch_resource;
pub use orchestrator::{FetchOrchestrator, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use session::{HttpResponse, HttpTransport, Session, TransportError};
