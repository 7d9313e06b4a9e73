pub mod ast;
pub mod ast_util;

#[macro_use]
pub mod print_parse;

pub mod derivation;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod update;
pub mod vcgen;

#[cfg(test)]
mod tests;
mod visitor;
