//! Minimal CLI: JSON samples → (swift | schema)
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use codable_gen::codegen::{Renderer, SwiftRenderer};
use codable_gen::naming;
use codable_gen::{EmptyArrayPolicy, Generation, Generator, GeneratorConfig, UrlMode, Warning};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Swift Codable models (or the inferred type tree) from sample JSON
#[derive(Parser, Debug)]
#[command(name = "codable-gen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit Swift Codable structs
    Swift(SwiftOut),
    /// print the inferred type definitions as JSON
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq pre-process filter for each document; several outputs are treated
    /// as an array of samples
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths, quoted glob patterns, or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// model name; defaults to the file stem when several inputs are given
    #[arg(long, short)]
    name: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct GeneratorSettings {
    /// JSON config file (see `GeneratorConfig`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// omit the attribution header
    #[arg(long)]
    no_header: bool,

    #[arg(long)]
    app_name: Option<String>,

    #[arg(long)]
    author: Option<String>,

    #[arg(long, value_enum)]
    url_mode: Option<UrlMode>,

    #[arg(long, value_enum)]
    empty_arrays: Option<EmptyArrayPolicy>,
}

#[derive(clap::Parser, Debug)]
struct SwiftOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator_settings: GeneratorSettings,

    /// output .swift file (stdout if omitted); single input only
    #[arg(short, long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// write one `<Model>.swift` per input into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// do not print field warnings
    #[arg(long, short)]
    quiet: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator_settings: GeneratorSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One input after loading and pre-filtering.
#[derive(Debug)]
struct Document {
    label: String,
    model_name: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>> {
        let sources = resolve_file_path_patterns(&self.input)?;
        let several = sources.len() > 1;
        let mut documents = Vec::with_capacity(sources.len());
        for source in sources {
            let (label, text) = match &source {
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
                    ("<stdin>".to_string(), text)
                }
                Some(path) => {
                    let text = std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    (path.display().to_string(), text)
                }
            };
            let value = serde_json::from_str::<Value>(&text)
                .with_context(|| format!("failed to parse JSON in {label}"))?;
            let value = self.select(value, &label)?;
            let model_name = match (&self.name, &source) {
                (Some(name), _) => name.clone(),
                (None, Some(path)) if several => model_name_from_path(path),
                _ => String::new(),
            };
            documents.push(Document { label, model_name, value });
        }
        Ok(documents)
    }

    fn select(&self, value: Value, label: &str) -> Result<Value> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => value
                .pointer(pointer)
                .cloned()
                .with_context(|| format!("JSON pointer {pointer} matches nothing in {label}"))?,
        };
        let Some(jq_expr) = self.jq_expr.as_deref() else {
            return Ok(value);
        };
        let mut outputs = crate::jq_exec::run_jaq(jq_expr, &value)
            .with_context(|| format!("failed to apply jq expression to {label}"))?;
        match outputs.len() {
            0 => bail!("jq expression produced no output for {label}"),
            1 => Ok(outputs.remove(0)),
            _ => Ok(Value::Array(outputs)),
        }
    }
}

impl GeneratorSettings {
    fn build(&self) -> Result<Generator> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)?,
            None => GeneratorConfig::default(),
        };
        if self.no_header {
            config.header = None;
        } else if let Some(header) = config.header.as_mut() {
            if let Some(app_name) = &self.app_name {
                header.app_name = app_name.clone();
            }
            if let Some(author) = &self.author {
                header.author = author.clone();
            }
        }
        if let Some(url_mode) = self.url_mode {
            config.url_mode = url_mode;
        }
        if let Some(empty_arrays) = self.empty_arrays {
            config.empty_arrays = empty_arrays;
        }
        tracing::debug!(?config, "generator config");
        Ok(Generator::new(config))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Swift(target) => target.run(),
            Command::Schema(target) => target.run(),
        }
    }
}

impl SwiftOut {
    fn run(&self) -> Result<()> {
        let generator = self.generator_settings.build()?;
        let documents = self.input_settings.load()?;
        if self.out.is_some() && documents.len() > 1 {
            bail!("--out takes a single input; use --out-dir for several");
        }

        // each call owns its state, so inputs can run side by side
        let results: Vec<(&Document, Result<Generation>)> = documents
            .par_iter()
            .map(|doc| {
                let generation = generator
                    .generate(&doc.value, &doc.model_name)
                    .with_context(|| format!("failed to generate model for {}", doc.label));
                (doc, generation)
            })
            .collect();

        let mut generated = Vec::with_capacity(results.len());
        for (doc, generation) in results {
            generated.push((doc, generation?));
        }
        let targets = match &self.out_dir {
            Some(dir) => Some(out_dir_targets(
                dir,
                generated.iter().map(|(doc, g)| (doc.label.as_str(), g.root_name.as_str())),
            )?),
            None => None,
        };

        for (index, (doc, generation)) in generated.iter().enumerate() {
            if !self.quiet {
                print_warnings(&doc.label, &generation.warnings);
            }
            if let Some(targets) = &targets {
                let path = &targets[index];
                write_output(path, &generation.source)?;
                eprintln!("{} {}", "wrote".green().bold(), path.display());
            } else if let Some(out) = &self.out {
                write_output(out, &generation.source)?;
            } else {
                print!("{}", generation.source);
            }
        }
        Ok(())
    }
}

impl SchemaOut {
    fn run(&self) -> Result<()> {
        let generator = self.generator_settings.build()?;
        let documents = self.input_settings.load()?;
        let mut schemas = serde_json::Map::new();
        for doc in &documents {
            let registry = generator
                .schema(&doc.value, &doc.model_name)
                .with_context(|| format!("failed to infer types for {}", doc.label))?;
            schemas.insert(doc.label.clone(), serde_json::to_value(&registry)?);
        }
        let schema = if documents.len() == 1 {
            schemas.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
        } else {
            Value::Object(schemas)
        };
        let schema_src = serde_json::to_string_pretty(&schema)?;
        match &self.out {
            Some(out) => write_output(out, &schema_src),
            None => {
                println!("{schema_src}");
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn print_warnings(label: &str, warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{} {}: {warning}", "warning:".yellow().bold(), label.dimmed());
    }
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// `<dir>/<Root>.swift` for each `(label, root_name)`. Two inputs landing on
/// the same file is an error, raised before anything is written.
fn out_dir_targets<'a, I>(dir: &Path, generated: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let extension = SwiftRenderer.file_extension();
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
    let mut targets = Vec::new();
    for (label, root_name) in generated {
        let path = dir.join(format!("{root_name}.{extension}"));
        if let Some(first) = claimed.insert(path.clone(), label) {
            bail!(
                "{label} and {first} both generate {}; give them distinct model names",
                path.display()
            );
        }
        targets.push(path);
    }
    Ok(targets)
}

fn model_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| naming::type_name(&stem.to_string_lossy()))
        .unwrap_or_default()
}

/// `None` stands for stdin.
fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<Option<PathBuf>>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            out.push(None);
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern {pattern}"))? {
                out.push(Some(entry?));
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(Some(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}
