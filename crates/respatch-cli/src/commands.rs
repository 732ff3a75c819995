use std::path::Path;

use anyhow::Context;
use colored::{ColoredString, Colorize};
use respatch_diff::{
    compare_snapshots, ChangeKind, Classifier, ClassifierConfig, DescriptorId, DescriptorTree,
    Patch, Side,
};
use respatch_store::{DumpLoader, ResourceTree, SnapshotHandle};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.format),
        Command::Tree(args) => cmd_tree(args, cli.format),
        Command::Rules(args) => cmd_rules(args, cli.format),
    }
}

fn load_config(rules: Option<&Path>) -> anyhow::Result<ClassifierConfig> {
    match rules {
        Some(path) => ClassifierConfig::from_toml_file(path)
            .with_context(|| format!("loading rules from {}", path.display())),
        None => Ok(ClassifierConfig::default()),
    }
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.rules.as_deref())?;
    let loader = DumpLoader::new();
    let bundle = compare_snapshots(&loader, &args.old, &args.new, &config)?;
    match format {
        OutputFormat::Text => println!("{}", render_patch(bundle.patch(), &config)),
        OutputFormat::Json => {
            let out = serde_json::json!({
                "summary": bundle.patch().summary(),
                "patch": bundle.patch(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn cmd_tree(args: TreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.rules.as_deref())?;
    let loader = DumpLoader::new();
    let snapshot = SnapshotHandle::open(&loader, &args.file)
        .with_context(|| format!("opening {}", args.file.display()))?;
    match format {
        OutputFormat::Text => println!("{}", render_tree(&snapshot, &config)),
        OutputFormat::Json => {
            let classifier = Classifier::new(&config);
            let descriptors = DescriptorTree::build(&snapshot, Side::New, &classifier);
            let rows: Vec<_> = descriptors
                .preorder()
                .map(|id| {
                    let d = descriptors.get(id);
                    serde_json::json!({
                        "path": d.path,
                        "type": d.type_tag,
                        "hash": d.content_hash,
                        "container": classifier.is_container(&snapshot, d.origin.node),
                        "shares_data": d.shares_data,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

fn cmd_rules(args: RulesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.rules.as_deref())?;
    match format {
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

fn change_marker(change: ChangeKind) -> ColoredString {
    match change {
        ChangeKind::Added => "+".green(),
        ChangeKind::Removed => "-".red(),
        ChangeKind::Altered => "~".yellow(),
        ChangeKind::ContainerChanged => "*".cyan(),
        ChangeKind::Unchanged => " ".normal(),
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn display_name(name: &str, folder: bool) -> String {
    if folder {
        format!("{name}/")
    } else {
        name.to_string()
    }
}

fn render_patch(patch: &Patch, config: &ClassifierConfig) -> String {
    if patch.is_empty() {
        return "No changes.".to_string();
    }
    let mut lines = Vec::with_capacity(patch.len() + 2);
    for (node, depth) in patch.iter() {
        // Top-level entries carry their full path; removals are always top-level.
        let name = if depth == 0 { node.path.as_str() } else { last_segment(&node.path) };
        lines.push(format!(
            "{}{} {}  {}",
            "  ".repeat(depth),
            change_marker(node.change),
            display_name(name, config.is_folder(&node.type_tag)).bold(),
            node.type_tag.as_str().dimmed(),
        ));
    }
    lines.push(String::new());
    lines.push(patch.summary().to_string());
    lines.join("\n")
}

fn render_tree(tree: &ResourceTree, config: &ClassifierConfig) -> String {
    let classifier = Classifier::new(config);
    let descriptors = DescriptorTree::build(tree, Side::New, &classifier);
    let mut lines = Vec::with_capacity(descriptors.len());
    for &root in descriptors.roots() {
        render_descriptor(&descriptors, tree, &classifier, root, 0, &mut lines);
    }
    if lines.is_empty() {
        lines.push("(empty)".to_string());
    }
    lines.join("\n")
}

fn render_descriptor(
    descriptors: &DescriptorTree,
    tree: &ResourceTree,
    classifier: &Classifier<'_>,
    id: DescriptorId,
    depth: usize,
    lines: &mut Vec<String>,
) {
    let d = descriptors.get(id);
    let folder = classifier.config().is_folder(&d.type_tag);
    let mut line = format!(
        "{}{}  {}  {}",
        "  ".repeat(depth),
        display_name(last_segment(&d.path), folder).bold(),
        d.type_tag.as_str().dimmed(),
        d.content_hash.short_hex().yellow(),
    );
    if classifier.is_container(tree, d.origin.node) {
        line.push_str(&format!("  {}", "[container]".cyan()));
    }
    if d.shares_data {
        line.push_str(&format!("  {}", "[shared]".magenta()));
    }
    lines.push(line);
    for &child in &d.children {
        render_descriptor(descriptors, tree, classifier, child, depth + 1, lines);
    }
}
