//! Tree-sitter based source parsing for the complexity pass.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tree_sitter::{Language as TsLanguage, Parser as TsParser, Tree};

use crate::core::{Error, Language, Result};

/// Thread-safe parser pool, one cached parser per language.
pub struct Parser {
    parsers: Mutex<HashMap<Language, TsParser>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser pool.
    pub fn new() -> Self {
        Self {
            parsers: Mutex::new(HashMap::new()),
        }
    }

    /// Parse content with explicit language.
    pub fn parse(&self, content: &[u8], lang: Language, path: &Path) -> Result<ParseResult> {
        let ts_lang = tree_sitter_language(lang);

        let tree = {
            let mut parsers = self.parsers.lock();
            let parser = parsers.entry(lang).or_insert_with(|| {
                let mut p = TsParser::new();
                p.set_language(&ts_lang).expect("grammar matches tree-sitter version");
                p
            });

            parser.parse(content, None).ok_or_else(|| Error::Parse {
                path: path.to_path_buf(),
                message: "Failed to parse file".to_string(),
            })?
        };

        Ok(ParseResult {
            tree: Arc::new(tree),
            language: lang,
            path: path.to_path_buf(),
        })
    }
}

/// Result of parsing one source file.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed syntax tree.
    pub tree: Arc<Tree>,
    /// Language of the source.
    pub language: Language,
    /// File path.
    pub path: PathBuf,
}

impl ParseResult {
    /// Root node of the tree.
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }
}

/// Map a [`Language`] onto its tree-sitter grammar.
fn tree_sitter_language(lang: Language) -> TsLanguage {
    let ts_lang = match lang {
        Language::Rust => tree_sitter_rust::LANGUAGE,
        Language::Python => tree_sitter_python::LANGUAGE,
        Language::Go => tree_sitter_go::LANGUAGE,
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TSX,
        Language::JavaScript => tree_sitter_javascript::LANGUAGE,
        Language::Java => tree_sitter_java::LANGUAGE,
        Language::C => tree_sitter_c::LANGUAGE,
        Language::Cpp => tree_sitter_cpp::LANGUAGE,
    };
    ts_lang.into()
}

/// AST node kinds counted as decision points, per language.
pub fn decision_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Rust => &[
            "if_expression",
            "match_expression",
            "for_expression",
            "while_expression",
            "loop_expression",
        ],
        Language::Python => &[
            "if_statement",
            "for_statement",
            "while_statement",
            "with_statement",
            "try_statement",
            "elif_clause",
            "except_clause",
            "comprehension",
            "conditional_expression",
        ],
        Language::Go => &[
            "if_statement",
            "for_statement",
            "select_statement",
            "type_switch_statement",
            "expression_switch_statement",
            "expression_case",
        ],
        Language::TypeScript | Language::JavaScript => &[
            "if_statement",
            "for_statement",
            "for_in_statement",
            "while_statement",
            "do_statement",
            "switch_statement",
            "ternary_expression",
            "catch_clause",
            "switch_case",
        ],
        Language::Java => &[
            "if_statement",
            "for_statement",
            "enhanced_for_statement",
            "while_statement",
            "do_statement",
            "switch_statement",
            "switch_expression",
            "catch_clause",
            "conditional_expression",
        ],
        Language::C | Language::Cpp => &[
            "if_statement",
            "for_statement",
            "while_statement",
            "do_statement",
            "switch_statement",
            "case_statement",
            "conditional_expression",
        ],
    }
}

/// Count decision-point nodes in a parsed file.
pub fn count_decision_points(result: &ParseResult) -> u32 {
    fn visit(node: tree_sitter::Node<'_>, kinds: &[&str], count: &mut u32) {
        if kinds.contains(&node.kind()) {
            *count += 1;
        }
        for child in node.children(&mut node.walk()) {
            visit(child, kinds, count);
        }
    }

    let kinds = decision_node_types(result.language);
    let mut count = 0;
    visit(result.root_node(), kinds, &mut count);
    count
}
