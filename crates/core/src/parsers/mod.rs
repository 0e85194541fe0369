//! Parsers module
//!
//! Thin adapter over Tree-sitter: resolves a grammar for a file name, parses
//! the source and snapshots the tree into a [`SyntaxArena`]. Tree-sitter is
//! error tolerant, so malformed code still yields a tree.

use crate::engine::SyntaxArena;
use crate::models::Language;
use std::path::Path;
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Parser errors
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Unrecognized or unsupported file type ({0})")]
    UnsupportedFileType(String),

    #[error("Failed to initialize parser: {0}")]
    InitError(String),

    #[error("Failed to parse source code: {0}")]
    ParseError(String),
}

/// Resolve the language for a file name
pub fn language_for_file(filename: &str) -> Result<Language, ParserError> {
    Language::from_path(Path::new(filename))
        .ok_or_else(|| ParserError::UnsupportedFileType(filename.to_string()))
}

/// Create a Tree-sitter parser for the specified language
pub fn create_parser(language: &Language) -> Result<Parser, ParserError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|e| ParserError::InitError(e.to_string()))?;
    Ok(parser)
}

/// Parse source code into a Tree-sitter tree
pub fn parse_tree(language: &Language, source: &str) -> Result<Tree, ParserError> {
    let mut parser = create_parser(language)?;
    parser
        .parse(source, None)
        .ok_or_else(|| ParserError::ParseError(format!("{} parser returned no tree", language.as_str())))
}

/// Parse source code and snapshot the named-node structure
pub fn parse_syntax(language: &Language, source: &str) -> Result<SyntaxArena, ParserError> {
    let tree = parse_tree(language, source)?;
    Ok(snapshot(tree.root_node()))
}

/// Copy the named-node structure under `root` into an arena
pub fn snapshot(root: Node) -> SyntaxArena {
    let mut arena = SyntaxArena::new(
        root.kind(),
        root.start_position().row,
        root.end_position().row,
    );

    let mut stack = vec![(root, arena.root())];
    while let Some((node, id)) = stack.pop() {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();

        // Children must be added in source order; visiting order only needs to be depth-first
        let mut pending = Vec::with_capacity(children.len());
        for child in children {
            let child_id = arena.add_child(
                id,
                child.kind(),
                child.start_position().row,
                child.end_position().row,
            );
            pending.push((child, child_id));
        }
        stack.extend(pending.into_iter().rev());
    }

    arena
}
