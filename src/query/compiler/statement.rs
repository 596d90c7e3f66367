//! 编译结果

use crate::core::Mode;

/// 编译完成的语句：物理表达式树的根节点加上编译时使用的模式
///
/// 每次 `prepare` 都会新建一个 Statement，编译器不保留对它的引用。
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<E> {
    root: E,
    mode: Mode,
}

impl<E> Statement<E> {
    pub fn new(root: E, mode: Mode) -> Self {
        Self { root, mode }
    }

    pub fn root(&self) -> &E {
        &self.root
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn into_root(self) -> E {
        self.root
    }

    pub fn into_parts(self) -> (E, Mode) {
        (self.root, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_parts() {
        let stmt = Statement::new("root", Mode::Permissive);
        assert_eq!(*stmt.root(), "root");
        assert_eq!(stmt.mode(), Mode::Permissive);
        assert_eq!(stmt.into_parts(), ("root", Mode::Permissive));
    }
}
