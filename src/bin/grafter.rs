//! CLI для вставки деревьев вывода
//!
//! ```bash
//! grafter insert --grammar lang.json --target target.json --insert assgn.json -n 5
//! grafter insert -g lang.json -t target.json -i assgn.json --before 0,0
//! grafter parents -g lang.json "<assgn>"
//! grafter path -g lang.json "<start>" "<assgn>"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use tree_grafter::cli_common::{self, CommonArgs, GrammarArgs, OutputWriter};
use tree_grafter::core::config::GraftConfig;
use tree_grafter::grammar::{GrammarGraph, GrammarIndex, ProductionPaths};
use tree_grafter::insertion::{InsertionRequest, OrderingPredicate, Relation};
use tree_grafter::tree::{DerivationTree, ParseTree, Path};

#[derive(Parser, Debug)]
#[command(
    name = "grafter",
    version,
    about = "Grammar-directed insertion of derivation trees",
    long_about = "Вставляет одно дерево вывода в другое так, чтобы результат оставался выводимым в грамматике"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert one derivation tree into another
    Insert {
        #[command(flatten)]
        grammar: GrammarArgs,

        /// Target parse tree (JSON)
        #[arg(short, long)]
        target: PathBuf,

        /// Tree to insert (JSON)
        #[arg(short, long)]
        insert: PathBuf,

        /// Stop after this many results
        #[arg(short = 'n', long)]
        max_solutions: Option<usize>,

        /// Keep results where the inserted text precedes the target node at this path
        #[arg(long, value_parser = parse_path, conflicts_with = "after")]
        before: Option<Path>,

        /// Keep results where the inserted text follows the target node at this path
        #[arg(long, value_parser = parse_path)]
        after: Option<Path>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// List symbols that can directly contain a symbol
    Parents {
        #[command(flatten)]
        grammar: GrammarArgs,

        symbol: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Shortest production path between two symbols
    Path {
        #[command(flatten)]
        grammar: GrammarArgs,

        from: String,
        to: String,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// "0,2,1" -> Path; пустая строка означает корень
fn parse_path(s: &str) -> Result<Path, String> {
    if s.trim().is_empty() {
        return Ok(Path::root());
    }
    s.split(',')
        .map(|p| p.trim().parse::<usize>().map_err(|e| format!("bad path index {:?}: {}", p, e)))
        .collect::<Result<Vec<_>, _>>()
        .map(Path::from)
}

fn load_config(common: &CommonArgs) -> Result<GraftConfig> {
    // предупреждения валидации пишет сам загрузчик
    let mut config = match &common.config {
        Some(path) => GraftConfig::load(path)?,
        None => GraftConfig::default(),
    };
    if let Some(format) = common.format {
        config.output.format = format;
    }
    Ok(config)
}

fn load_grammar(args: &GrammarArgs) -> Result<GrammarIndex> {
    cli_common::validate_path(&args.grammar, "Grammar file")?;
    let grammar = GrammarIndex::load_from_file(&args.grammar)?;
    info!("Loaded grammar: {} nonterminals, {} productions", grammar.len(), grammar.production_count());
    Ok(grammar)
}

fn load_tree(path: &std::path::Path, description: &str) -> Result<DerivationTree> {
    cli_common::validate_path(path, description)?;
    Ok(DerivationTree::from_parse_tree(&ParseTree::load_from_file(path)?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Insert { grammar, target, insert, max_solutions, before, after, common } => {
            run_insert(&grammar, &target, &insert, max_solutions, before, after, &common)
        }
        Command::Parents { grammar, symbol, common } => run_parents(&grammar, &symbol, &common),
        Command::Path { grammar, from, to, common } => run_path(&grammar, &from, &to, &common),
    };

    if let Err(e) = &result {
        cli_common::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run_insert(
    grammar_args: &GrammarArgs,
    target_path: &std::path::Path,
    insert_path: &std::path::Path,
    max_solutions: Option<usize>,
    before: Option<Path>,
    after: Option<Path>,
    common: &CommonArgs,
) -> Result<()> {
    cli_common::init_logging(common.verbose)?;
    let config = load_config(common)?;
    let grammar = load_grammar(grammar_args)?;
    let target = load_tree(target_path, "Target tree")?;
    let insert = load_tree(insert_path, "Insert tree")?;

    let predicate = match (before, after) {
        (Some(path), _) => Some((Relation::Before, path)),
        (None, Some(path)) => Some((Relation::After, path)),
        (None, None) => None,
    }
    .map(|(relation, path)| -> Result<OrderingPredicate> {
        let reference = target
            .subtree_at(&path)
            .with_context(|| format!("Reference node for --{:?} not found", relation).to_lowercase())?;
        Ok(OrderingPredicate::new(relation, reference.id()))
    })
    .transpose()?;

    let mut request = InsertionRequest::new(&grammar, insert, target).with_config(&config);
    if let Some(max) = max_solutions {
        request = request.with_max_solutions(max);
    }
    if let Some(predicate) = predicate {
        request = request.with_predicate(predicate);
    }

    let started = Instant::now();
    let mut engine = request.run();
    let results: Vec<DerivationTree> = engine.by_ref().collect();
    let stats = engine.stats();

    OutputWriter::stdout(config.output.clone()).write_results(&results, stats)?;

    if results.is_empty() {
        cli_common::print_warning("No insertion found");
    } else if common.verbose {
        cli_common::print_success(&format!(
            "{} result(s) in {} ({} candidates, {} rejected, {} extensions)",
            results.len(),
            cli_common::format_duration(started.elapsed()),
            stats.candidates,
            stats.rejected,
            stats.extensions
        ));
    }
    Ok(())
}

fn run_parents(grammar_args: &GrammarArgs, symbol: &str, common: &CommonArgs) -> Result<()> {
    cli_common::init_logging(common.verbose)?;
    let config = load_config(common)?;
    let grammar = load_grammar(grammar_args)?;
    let symbol = grammar.symbol(symbol);
    let parents = grammar.possible_parents(&symbol);
    if parents.is_empty() {
        cli_common::print_info(&format!("{} has no parents", symbol));
    }
    OutputWriter::stdout(config.output)
        .write_symbols(&format!("Parents of {}", symbol), parents.iter().map(|s| s.as_str()))
}

fn run_path(grammar_args: &GrammarArgs, from: &str, to: &str, common: &CommonArgs) -> Result<()> {
    cli_common::init_logging(common.verbose)?;
    let config = load_config(common)?;
    let grammar = load_grammar(grammar_args)?;
    let graph = GrammarGraph::from_grammar(&grammar);
    let (from, to) = (grammar.symbol(from), grammar.symbol(to));
    match graph.shortest_production_path(&from, &to) {
        Some(path) => OutputWriter::stdout(config.output)
            .write_symbols(&format!("{} → {}", from, to), path.iter().map(|s| s.as_str())),
        None => Err(anyhow::anyhow!("{} is not reachable from {}", to, from)),
    }
}
