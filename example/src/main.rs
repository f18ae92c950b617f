// example/src/main.rs

#[allow(dead_code)]
mod ast {
    include!(concat!(env!("OUT_DIR"), "/ast.rs"));
}

#[allow(dead_code)]
mod visitor {
    include!(concat!(env!("OUT_DIR"), "/visitor.rs"));
}

use ast::*;
use visitor::{walk_expr, walk_pattern, Visitor};

/// Byte range of a node in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end:   u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }
}

/// Collects every variable name, in source order.
#[derive(Default)]
struct NameCollector<'src> {
    names: Vec<&'src str>,
}

impl<'src> Visitor<'src> for NameCollector<'src> {
    fn visit_expr(&mut self, node: &Expr<'src>) {
        if let Expr::Var(_, name) = node {
            self.names.push(*name);
        }
        walk_expr(self, node)
    }

    fn visit_pattern(&mut self, node: &Pattern<'src>) {
        if let Pattern::Var(_, name) = node {
            self.names.push(*name);
        }
        walk_pattern(self, node)
    }
}

fn var(start: u32, name: &str) -> Expr<'_> {
    Expr::Var(Span::new(start, start + name.len() as u32), name)
}

/// let total = a + b;
/// if (total) log(total);
fn sample(source: &str) -> SourceFile<'_> {
    let decl = VarDecl {
        span:        Span::new(0, 18),
        decl_type:   DeclType::Let,
        declarators: vec![VarDeclarator {
            span:    Span::new(4, 17),
            pattern: Pattern::Var(Span::new(4, 9), &source[4..9]),
            init:    Some(Expr::BinOp(
                Span::new(12, 17),
                Box::new(var(12, &source[12..13])),
                BinOp::Add,
                Box::new(var(16, &source[16..17])),
            )),
        }],
    };

    let call = Expr::Call(
        Span::new(30, 40),
        Box::new(var(30, &source[30..33])),
        vec![var(34, &source[34..39])],
    );
    let if_stmt = Stmt::If(
        Span::new(19, 41),
        Box::new(var(23, &source[23..28])),
        Box::new(Stmt::Expr(Span::new(30, 41), Box::new(call))),
        None,
    );

    SourceFile {
        span:  Span::new(0, source.len() as u32),
        stmts: vec![Stmt::VarDecl(Span::new(0, 18), decl), if_stmt],
    }
}

const SOURCE: &str = "let total = a + b;\nif (total) log(total);";

fn main() {
    let file = sample(SOURCE);

    let mut collector = NameCollector::default();
    collector.visit_source_file(&file);

    for stmt in &file.stmts {
        let span = stmt.span();
        println!("{:?} => {:?}", span, &SOURCE[span.start as usize..span.end as usize]);
    }
    println!("names in order: {:?}", collector.names);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_follows_source_order() {
        let file = sample(SOURCE);
        let mut collector = NameCollector::default();
        collector.visit_source_file(&file);
        assert_eq!(collector.names, vec!["total", "a", "b", "total", "log", "total"]);
    }

    #[test]
    fn test_span_accessors() {
        let file = sample(SOURCE);
        assert_eq!(file.span(), Span::new(0, 41));
        assert_eq!(file.stmts[0].span(), Span::new(0, 18));
        assert_eq!(file.stmts[1].span(), Span::new(19, 41));
        match &file.stmts[1] {
            Stmt::If(_, test, _, _) => assert_eq!(test.span(), Span::new(23, 28)),
            other => panic!("expected an if statement, got {:?}", other),
        }
    }

    /// Counts statements without descending into them.
    struct StmtCounter {
        count: usize,
    }

    impl<'src> Visitor<'src> for StmtCounter {
        fn visit_stmt(&mut self, _node: &Stmt<'src>) {
            self.count += 1;
        }

        fn visit_expr(&mut self, _node: &Expr<'src>) {
            panic!("top-level statements were not pruned");
        }
    }

    #[test]
    fn test_overriding_without_walking_prunes() {
        let file = sample(SOURCE);
        let mut counter = StmtCounter { count: 0 };
        counter.visit_source_file(&file);
        assert_eq!(counter.count, 2);
    }

    #[test]
    fn test_plain_enums_are_copy() {
        let op = BinOp::Add;
        let copy = op;
        assert_eq!(op, copy);
    }
}
