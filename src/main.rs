use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use richtext::search::{self, Collection, Entry, Filter};
use richtext::{Config, ContentBlock, Error};

#[derive(Parser)]
#[command(name = "richtext")]
#[command(about = "Render CMS rich-text blocks to HTML")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a block array (JSON) or a Markdown file to HTML
    Render {
        /// Input file, `-` for stdin. `.md` files are imported first
        input: PathBuf,

        /// Output HTML file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML config file
        #[arg(short, long, default_value = "richtext.toml")]
        config: PathBuf,

        /// JSON pointer to the block array, e.g. /data/content
        #[arg(short, long)]
        pointer: Option<String>,
    },

    /// Convert Markdown to CMS block JSON
    Import {
        /// Input Markdown file, `-` for stdin
        input: PathBuf,

        /// Output JSON file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the summary text of a block array
    Excerpt {
        /// Input JSON file, `-` for stdin
        input: PathBuf,

        /// JSON pointer to the block array
        #[arg(short, long)]
        pointer: Option<String>,
    },

    /// Search a CMS collection by title and excerpt
    Search {
        /// Collection JSON (`{"data": [...]}`), `-` for stdin
        input: PathBuf,

        query: String,

        /// Maximum number of hits
        #[arg(short = 'n', long, default_value_t = search::DEFAULT_LIMIT)]
        limit: usize,
    },

    /// List one page of a CMS collection, optionally filtered
    List {
        /// Collection JSON (`{"data": [...]}`), `-` for stdin
        input: PathBuf,

        /// Match title, excerpt, category or tags
        #[arg(short, long, default_value = "")]
        query: String,

        /// Exact category
        #[arg(short, long, default_value = "")]
        category: String,

        /// One of the comma separated tags
        #[arg(short, long, default_value = "")]
        tag: String,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = search::DEFAULT_PER_PAGE)]
        per_page: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Render {
            input,
            output,
            config,
            pointer,
        } => {
            let config = Config::load(&config)?;
            let blocks = load_blocks(&input, pointer.as_deref())?;
            let html = richtext::blocks_to_html(&blocks, &config);
            write_output(output.as_deref(), &html)
        }
        Command::Import { input, output } => {
            let markdown = read_input(&input)?;
            let blocks = richtext::parse_markdown(&markdown);
            let mut json = serde_json::to_string_pretty(&blocks)?;
            json.push('\n');
            write_output(output.as_deref(), &json)
        }
        Command::Excerpt { input, pointer } => {
            let blocks = load_blocks(&input, pointer.as_deref())?;
            println!("{}", richtext::excerpt(&blocks));
            Ok(())
        }
        Command::Search {
            input,
            query,
            limit,
        } => {
            let collection: Collection<Entry> = serde_json::from_str(&read_input(&input)?)?;
            for hit in search::quick_search(&collection.data, &query, limit) {
                println!("{}\t{}", hit.document_id, hit.title);
            }
            Ok(())
        }
        Command::List {
            input,
            query,
            category,
            tag,
            page,
            per_page,
        } => {
            let collection: Collection<Entry> = serde_json::from_str(&read_input(&input)?)?;
            let filter = Filter {
                query,
                category,
                tag,
            };
            let listing = search::list_page(&collection.data, &filter, page, per_page);
            for entry in &listing.entries {
                println!("{}\t{}", entry.document_id, entry.title);
            }
            eprintln!(
                "page {} of {} ({} matching)",
                listing.page, listing.page_count, listing.total
            );
            Ok(())
        }
    }
}

fn load_blocks(input: &Path, pointer: Option<&str>) -> Result<Vec<ContentBlock>, Error> {
    let content = read_input(input)?;
    if input.extension().is_some_and(|ext| ext == "md") {
        return Ok(richtext::parse_markdown(&content));
    }
    let decoded = richtext::decode_str(&content, pointer)?;
    if !decoded.skipped.is_empty() {
        log::info!(
            "{} of {} blocks skipped",
            decoded.skipped.len(),
            decoded.blocks.len() + decoded.skipped.len()
        );
    }
    Ok(decoded.blocks)
}

fn read_input(input: &Path) -> Result<String, Error> {
    let io_error = |source| Error::Io {
        path: input.to_path_buf(),
        source,
    };
    if input == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).map_err(io_error)?;
        return Ok(content);
    }
    fs::read_to_string(input).map_err(io_error)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Error> {
    match output {
        Some(path) => {
            fs::write(path, content).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
