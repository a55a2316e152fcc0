//! Wombat CLI
//!
//! Runs a selector list against a tree described in JSON and prints the
//! matching nodes in document order.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use wombat_dom::{DomTree, Fragment, NodeId, NodeType};
use wombat_query::{QueryConfig, QueryError, UnknownPseudoClassPolicy, compile_with, select};

/// Wombat - CSS selector compiler and DOM query engine
#[derive(Parser, Debug)]
#[command(name = "wombat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    wombat page.json "ul > li:nth-child(odd)"
    wombat page.json "a[href$='.pdf' i]" --tree
    wombat page.json "div:wibble, p" --ignore-unknown

The tree file holds one fragment or an array of fragments:
    [{ "tag": "ul", "attrs": { "id": "nav" }, "children": [
        { "tag": "li", "children": ["Home"] },
        { "comment": "more later" }
    ]}]"#)]
struct Cli {
    /// JSON file describing the document
    #[arg(value_name = "TREE.json")]
    tree: PathBuf,

    /// Selector list to run against the whole document
    #[arg(value_name = "SELECTOR")]
    selector: String,

    /// Compile unknown pseudo-classes to predicates that never match
    #[arg(long)]
    ignore_unknown: bool,

    /// Compare attribute values case-insensitively unless a selector flag overrides it
    #[arg(long)]
    case_insensitive_attrs: bool,

    /// Maximum nesting of pseudo-class arguments
    #[arg(long, value_name = "N", default_value_t = QueryConfig::DEFAULT_MAX_NESTING_DEPTH)]
    max_depth: usize,

    /// Print the whole subtree of each match
    #[arg(long = "tree")]
    subtree: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let tree = load_tree(&cli.tree)?;
    let config = QueryConfig::default()
        .with_unknown_pseudo_class(if cli.ignore_unknown {
            UnknownPseudoClassPolicy::Ignore
        } else {
            UnknownPseudoClassPolicy::Fail
        })
        .with_case_sensitive_attributes(!cli.case_insensitive_attrs)
        .with_max_nesting_depth(cli.max_depth);

    let list = compile_with(&cli.selector, &config)
        .inspect_err(|err| print_caret(&cli.selector, err))
        .with_context(|| format!("invalid selector `{}`", cli.selector))?;
    let matches = select(&tree, list).context("selector evaluation failed")?;

    println!(
        "{} {}",
        matches.len().bold(),
        if matches.len() == 1 { "match" } else { "matches" }
    );
    for (index, node) in matches.iter().enumerate() {
        print!("{} ", format!("[{index}]").dimmed());
        if cli.subtree {
            println!();
            print_tree(&tree, node, 1);
        } else {
            println!("{}", describe(&tree, node));
        }
    }

    Ok(())
}

/// Read `path` as either a single fragment or an array of fragments.
fn load_tree(path: &Path) -> Result<DomTree> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let fragments = match serde_json::from_str::<Vec<Fragment>>(&text) {
        Ok(fragments) => fragments,
        Err(_) => vec![
            serde_json::from_str::<Fragment>(&text)
                .with_context(|| format!("{} is not a fragment tree", path.display()))?,
        ],
    };
    Ok(DomTree::from_fragments(&fragments))
}

/// Point at the offending byte of a compilation error on stderr.
fn print_caret(selector: &str, err: &QueryError) {
    let Some(offset) = err.offset() else {
        return;
    };
    let column = selector.get(..offset).map_or(0, |prefix| prefix.chars().count());
    eprintln!("  {selector}");
    eprintln!("  {}{}", " ".repeat(column), "^".red().bold());
}

/// One-line rendering of a node: `<tag k="v">`, `"text"` or `<!-- comment -->`.
fn describe(tree: &DomTree, id: NodeId) -> String {
    let Some(node) = tree.get(id) else {
        return String::new();
    };
    match &node.node_type {
        NodeType::Document => "Document".to_string(),
        NodeType::Element(data) => {
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort();
            let mut out = format!("<{}", data.tag_name.cyan());
            for (k, v) in attrs {
                let _ = if v.is_empty() {
                    write!(out, " {}", k.yellow())
                } else {
                    write!(out, " {}=\"{}\"", k.yellow(), v.green())
                };
            }
            out.push('>');
            out
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            format!("\"{display}\"")
        }
        NodeType::Comment(data) => format!("<!-- {data} -->").dimmed().to_string(),
    }
}

fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    println!("{}{}", "  ".repeat(indent), describe(tree, id));
    for &child in tree.children(id) {
        print_tree(tree, child, indent + 1);
    }
}
