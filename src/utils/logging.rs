// 编译器日志
//
// 基于 flexi_logger 的文件日志：按大小滚动，异步写入。
// 进程内只能有一个全局 logger，句柄保存在 `LOGGER_HANDLE` 中供 `shutdown` 时 flush。

use crate::config::{Config, LogConfig};
use crate::core::ConfigError;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::sync::{Mutex, MutexGuard, PoisonError};

static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// 取得句柄槽位
///
/// 持锁线程 panic 后槽位内容仍然有效，直接接管被毒化的锁
fn handle_slot() -> MutexGuard<'static, Option<LoggerHandle>> {
    LOGGER_HANDLE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 按日志配置构造 logger，尚未启动
fn build_logger(log: &LogConfig) -> Result<Logger, ConfigError> {
    let files = FileSpec::default()
        .directory(&log.dir)
        .basename(&log.file);
    Ok(Logger::try_with_str(&log.level)?
        .log_to_file(files)
        .rotate(
            Criterion::Size(log.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(log.max_files),
        )
        .write_mode(WriteMode::Async)
        .append())
}

/// 初始化编译器日志
///
/// 日志级别串无法解析或日志文件无法创建时返回 `ConfigError::Logger`。
/// 已经初始化过时直接返回。
///
/// ```no_run
/// use partiql_compiler::config::Config;
/// use partiql_compiler::utils::logging;
///
/// logging::init(&Config::default()).expect("日志初始化失败");
/// ```
pub fn init(config: &Config) -> Result<(), ConfigError> {
    let mut slot = handle_slot();
    if slot.is_some() {
        return Ok(());
    }
    let handle = build_logger(&config.log)?.start()?;
    *slot = Some(handle);
    drop(slot);

    log::info!(
        "编译器日志已启用: 级别 {}, 输出 {}/{}",
        config.log.level,
        config.log.dir,
        config.log.file
    );
    Ok(())
}

/// flush 异步缓冲并释放句柄
pub fn shutdown() {
    if let Some(handle) = handle_slot().take() {
        handle.flush();
    }
}

pub fn is_initialized() -> bool {
    handle_slot().is_some()
}
