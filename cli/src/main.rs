use anyhow::Result;
use clap::Parser;
use newshound_core::{load_corpus, NavigationHistory, RecentQueries, SearchEngine};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "newshound")]
#[command(about = "Interactive TF-IDF article search", long_about = None)]
struct Args {
    /// Corpus JSON file (topic groups with article records)
    #[arg(long)]
    corpus: String,
    /// Maximum results per query
    #[arg(long, default_value_t = 10)]
    top_k: usize,
    /// Minimum score for a result
    #[arg(long, default_value_t = 0.001)]
    min_score: f64,
    /// Related-article listing limit
    #[arg(long, default_value_t = 5)]
    related: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let groups = load_corpus(&args.corpus)?;
    let engine = SearchEngine::from_groups(&groups)?;
    tracing::info!(articles = engine.total_articles(), corpus = %args.corpus, "engine ready");
    println!(
        "indexed {} articles; type a query, or :help for commands",
        engine.total_articles()
    );

    let mut history = NavigationHistory::new();
    let mut recent = RecentQueries::new();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            ":q" | ":quit" => break,
            ":help" => {
                println!(":back / :forward   walk the query history");
                println!(":recent            recently submitted queries");
                println!(":suggest           sample queries from the corpus");
                println!(":related <id>      articles related to an article id");
                println!(":q                 quit");
            }
            ":back" => match history.go_back().map(str::to_string) {
                Some(query) => {
                    println!("back to: {query}");
                    run_query(&engine, &query, &args);
                }
                None => println!("already at the oldest query"),
            },
            ":forward" => match history.go_forward().map(str::to_string) {
                Some(query) => {
                    println!("forward to: {query}");
                    run_query(&engine, &query, &args);
                }
                None => println!("already at the newest query"),
            },
            ":recent" => {
                for query in recent.iter() {
                    println!("  {query}");
                }
            }
            ":suggest" => {
                for query in engine.sample_queries() {
                    println!("  {query}");
                }
            }
            _ if input.starts_with(":related ") => {
                let id = input.trim_start_matches(":related ").trim();
                let related = engine.related_articles(id, args.related);
                if related.is_empty() {
                    println!("no related articles for {id}");
                }
                for related_id in related {
                    match engine.get_article(&related_id) {
                        Some(article) => println!("  {related_id}  {}", article.title),
                        None => println!("  {related_id}"),
                    }
                }
            }
            query => {
                history.visit(query);
                recent.record(query);
                run_query(&engine, query, &args);
            }
        }
    }

    Ok(())
}

fn run_query(engine: &SearchEngine, query: &str, args: &Args) {
    let (results, suggestion) = engine.rank(query, args.top_k, args.min_score);
    if let Some(corrected) = suggestion {
        println!("did you mean: {corrected}");
    }
    if results.is_empty() {
        println!("no results");
        return;
    }
    for (rank, (article, score)) in results.iter().enumerate() {
        println!(
            "{:2}. [{score:.4}] {}  ({})",
            rank + 1,
            article.title,
            article.unique_id
        );
    }
}
