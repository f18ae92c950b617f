use std::{env, path::PathBuf};

use astgen_compiler::{write_generated, GenOptions};
use astgen_schema::js_ast;

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set for build scripts"));
    let schema = js_ast().unwrap_or_else(|err| panic!("invalid JavaScript AST schema: {}", err));

    let options = GenOptions {
        ast_command:     "cargo build -p astgen-example".to_string(),
        visitor_command: "cargo build -p astgen-example".to_string(),
        ..GenOptions::default()
    };
    write_generated(&out_dir, &schema, &options)
        .unwrap_or_else(|err| panic!("generating the AST failed: {}", err));

    println!("cargo:rerun-if-changed=build.rs");
}
