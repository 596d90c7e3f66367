//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use partiql_compiler::core::CompileError;

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>, expected_msg: &str) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 断言编译因缺少策略而失败，并返回出错位置
pub fn assert_unsupported<T: std::fmt::Debug>(result: Result<T, CompileError>, kind: &str) -> String {
    match result.expect_err("编译应该失败") {
        CompileError::UnsupportedOperator { kind: actual, path } => {
            assert_eq!(actual, kind, "不支持的算子类型不匹配");
            path.to_string()
        }
        other => panic!("期望 UnsupportedOperator, 实际是 {:?}", other),
    }
}

/// 断言编译因畸形计划而失败
pub fn assert_malformed<T: std::fmt::Debug>(result: Result<T, CompileError>, kind: &str) {
    match result.expect_err("编译应该失败") {
        CompileError::MalformedPlan { kind: actual, .. } => {
            assert_eq!(actual, kind, "畸形节点类型不匹配");
        }
        other => panic!("期望 MalformedPlan, 实际是 {:?}", other),
    }
}
