//! Node schema of the JavaScript AST.
//!
//! Every declaration is one entry of a nested list:
//!
//! - `["ast", "struct", Name, [field, type], ...]`: a node struct,
//! - `["ast", "enum", Name, [Variant, type, ...], ...]`: a node enum,
//! - `["enum", Name, Tag, ...]`: a plain enum with no span.
//!
//! Types are written in text form (`"Option<Box<Expr>>"`). `Ident` is source
//! text borrowed from the file being parsed. Any recursion through an enum
//! must go through `Box` or `Vec` so the generated types stay sized.
//!
//! After editing, regenerate the checked-in outputs with `astgen ast` and
//! `astgen visitor`.

use astgen_compiler::{parse_schema, GenError, Schema};
use serde_json::{json, Value};

/// The raw declaration list.
pub fn js_ast_items() -> Value {
    Value::Array(vec![
        json!(["ast", "struct", "SourceFile",
            ["stmts", "Vec<Stmt>"]]),
        json!(["ast", "struct", "Text",
            ["text", "Ident"]]),
        json!(["ast", "struct", "Label",
            ["name", "Ident"]]),
        json!(["ast", "struct", "Block",
            ["stmts", "Vec<Stmt>"]]),

        json!(["ast", "enum", "Stmt",
            ["Expr", "Box<Expr>"],
            ["Block", "Block"],
            ["Return", "Option<Box<Expr>>"],
            ["VarDecl", "VarDecl"],
            ["If", "Box<Expr>", "Box<Stmt>", "Option<Box<Stmt>>"],
            ["Switch", "Box<Expr>", "Vec<SwitchCase>"],
            ["While", "Box<Expr>", "Box<Stmt>"],
            ["DoWhile", "Box<Stmt>", "Box<Expr>"],
            ["Try", "Box<TryStmt>"],
            ["For", "Box<For>"],
            ["ForInOrOf", "Box<ForInOrOf>"],
            ["Break", "Option<Label>"],
            ["Continue", "Option<Label>"],
            ["Debugger"],
            ["With", "Box<Expr>", "Box<Stmt>"],
            ["FunctionDecl", "Function"],
            ["ClassDecl", "Box<Class>"],
            ["Empty"]]),

        json!(["ast", "enum", "Expr",
            ["Var", "Ident"],
            ["BinOp", "Box<Expr>", "BinOp", "Box<Expr>"],
            ["ArrowFn", "ParamList", "Box<ArrowFnBody>"],
            ["Function", "Function"],
            ["Call", "Box<Expr>", "Vec<Expr>"],
            ["Index", "Box<Expr>", "Box<Expr>"],
            ["Prop", "Box<Expr>", "Ident"],
            ["String", "Text"],
            ["Number", "Text"],
            ["Boolean", "bool"],
            ["Null"],
            ["Undefined"],
            ["Object", "Vec<ObjectLiteralEntry>"],
            ["Throw", "Box<Expr>"],
            ["PostIncrement", "Box<Expr>"],
            ["PostDecrement", "Box<Expr>"],
            ["PreIncrement", "Box<Expr>"],
            ["PreDecrement", "Box<Expr>"],
            ["Array", "Vec<ArrayLiteralMember>"],
            ["New", "Box<Expr>"],
            ["Yield", "Option<Box<Expr>>"],
            ["YieldFrom", "Box<Expr>"],
            ["Ternary", "Box<Expr>", "Box<Expr>", "Box<Expr>"],
            ["Assign", "Box<Pattern>", "AssignOp", "Box<Expr>"],
            ["Regex", "Text"],
            // Unary operators
            ["Delete", "Box<Expr>"],
            ["Void", "Box<Expr>"],
            ["TypeOf", "Box<Expr>"],
            ["UnaryPlus", "Box<Expr>"],
            ["UnaryMinus", "Box<Expr>"],
            ["BitNot", "Box<Expr>"],
            ["Not", "Box<Expr>"],
            ["Await", "Box<Expr>"],
            ["Comma", "Vec<Expr>"],
            ["Super"],
            ["Class", "Box<Class>"],
            ["TemplateLiteral", "Vec<TemplateLiteralFragment>"]]),

        json!(["ast", "enum", "Pattern",
            ["Var", "Ident"],
            ["Assignment", "Box<Pattern>", "Box<Expr>"],
            ["Array", "Vec<Pattern>"],
            ["Object", "ObjectPattern"],
            ["Elision"],
            ["Rest", "Box<Pattern>"]]),

        json!(["ast", "struct", "Class",
            ["name", "Option<Ident>"],
            ["superclass", "Option<Box<Expr>>"],
            ["body", "ClassBody"]]),
        json!(["ast", "struct", "ClassBody",
            ["members", "Vec<ClassMember>"]]),
        json!(["ast", "enum", "ClassMember",
            ["MethodDef", "MethodDef"],
            ["FieldDef", "FieldDef"]]),
        json!(["ast", "struct", "FieldDef",
            ["name", "Ident"],
            ["initializer", "Option<Expr>"]]),
        json!(["ast", "struct", "MethodDef",
            ["name", "ObjectKey"],
            ["body", "Function"],
            ["accessor_type", "Option<AccessorType>"]]),

        json!(["ast", "enum", "ObjectKey",
            ["Ident", "Ident"],
            ["String", "Text"],
            ["Computed", "Box<Expr>"]]),
        json!(["ast", "enum", "ObjectLiteralEntry",
            ["Ident", "Ident"],
            ["Prop", "ObjectKey", "Expr"],
            ["Method", "MethodDef"],
            ["Spread", "Expr"]]),
        json!(["ast", "enum", "ArrayLiteralMember",
            ["Expr", "Expr"],
            ["Elision"],
            ["Spread", "Expr"]]),

        json!(["ast", "struct", "ParamList",
            ["params", "Vec<Param>"]]),
        json!(["ast", "struct", "Param",
            ["pattern", "Pattern"]]),
        json!(["ast", "struct", "Function",
            ["name", "Option<Ident>"],
            ["params", "ParamList"],
            ["body", "Block"],
            ["is_generator", "bool"],
            ["is_async", "bool"]]),
        json!(["ast", "enum", "ArrowFnBody",
            ["Expr", "Box<Expr>"],
            ["Block", "Block"]]),

        json!(["ast", "struct", "SwitchCase",
            ["test", "Option<Expr>"],
            ["body", "Vec<Stmt>"]]),
        json!(["ast", "struct", "VarDecl",
            ["decl_type", "DeclType"],
            ["declarators", "Vec<VarDeclarator>"]]),
        json!(["ast", "struct", "VarDeclarator",
            ["pattern", "Pattern"],
            ["init", "Option<Expr>"]]),
        json!(["ast", "struct", "For",
            ["init", "ForInit"],
            ["test", "Option<Expr>"],
            ["update", "Option<Expr>"],
            ["body", "Box<Stmt>"]]),
        json!(["ast", "enum", "ForInit",
            ["VarDecl", "VarDecl"],
            ["Expr", "Expr"]]),
        json!(["ast", "struct", "ForInOrOf",
            // None for `for (x of y) {}`
            ["decl_type", "Option<DeclType>"],
            ["lhs", "Pattern"],
            ["in_or_of", "InOrOf"],
            ["rhs", "Expr"],
            ["body", "Box<Stmt>"]]),
        json!(["ast", "struct", "TryStmt",
            ["try_block", "Block"],
            ["catch_pattern", "Option<Pattern>"],
            ["catch_block", "Option<Block>"],
            ["finally_block", "Option<Block>"]]),
        json!(["ast", "enum", "TemplateLiteralFragment",
            ["Text", "Text"],
            ["Expr", "Expr"]]),
        json!(["ast", "struct", "ObjectPattern",
            ["properties", "Vec<ObjectPatternProperty>"],
            ["rest", "Option<Box<Pattern>>"]]),
        json!(["ast", "struct", "ObjectPatternProperty",
            ["key", "ObjectKey"],
            ["value", "Pattern"]]),

        json!(["enum", "BinOp",
            // Arithmetic
            "Add", "Sub", "Mul", "Div", "Mod",
            // Bitwise
            "BitXor", "BitAnd", "BitOr",
            // Logical
            "And", "Or",
            // Relational
            "Gt", "Lt", "Gte", "Lte",
            // Equality
            "EqEq", "EqEqEq", "NotEq", "NotEqEq",
            "In", "Instanceof",
            // Shift
            "LeftShift", "RightShift", "UnsignedRightShift"]),
        json!(["enum", "AssignOp",
            "Eq", "MulEq", "DivEq", "ModEq", "AddEq", "SubEq",
            "LeftShiftEq", "RightShiftEq", "UnsignedRightShiftEq",
            "BitAndEq", "BitXorEq", "BitOrEq", "ExponentEq"]),
        json!(["enum", "DeclType", "Let", "Const", "Var"]),
        json!(["enum", "AccessorType", "Get", "Set"]),
        json!(["enum", "InOrOf", "In", "Of"]),
    ])
}

/// The JavaScript AST schema.
pub fn js_ast() -> Result<Schema, GenError> {
    parse_schema(&js_ast_items())
}
