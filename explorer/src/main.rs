//! Interactive knowledge graph explorer.
//!
//! Numbered console menu over the read-only query facade, plus a
//! natural-language search that turns free text into substring filters.

use anyhow::{Context, Result};
use graphloom_config::Settings;
use graphloom_graph::explore::SearchHit;
use graphloom_graph::GraphClient;
use std::io::{self, Write};

mod display;
mod terms;

const SEARCH_LIMIT: i64 = 10;
const MAX_PATH_HOPS: usize = 3;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let settings = Settings::from_env();
    let client = GraphClient::connect(&settings)
        .await
        .context("Failed to connect to Neo4j")?;

    println!("✅ Successfully connected to Neo4j");
    main_menu(&client).await?;
    println!("\nGoodbye!");
    Ok(())
}

async fn main_menu(client: &GraphClient) -> Result<()> {
    loop {
        clear_screen();
        println!(
            "\n🌐 Knowledge Graph Explorer\n\
             ================================\n\
             1. View Graph Summary\n\
             2. Search for Nodes\n\
             3. Explore Node Details\n\
             4. Find Paths Between Nodes\n\
             5. Check for Duplicate Relationships\n\
             6. Natural Language Search\n\
             0. Exit\n"
        );

        let choice = prompt("Enter your choice (0-6): ")?;
        match choice.as_str() {
            "0" => return Ok(()),
            "1" => show_summary(client).await?,
            "2" => search_menu(client).await?,
            "3" => show_node(client).await?,
            "4" => show_paths(client).await?,
            "5" => show_duplicates(client).await?,
            "6" => natural_language_search(client).await?,
            _ => {
                println!("\nInvalid choice. Please try again.");
                pause()?;
            }
        }
    }
}

async fn show_summary(client: &GraphClient) -> Result<()> {
    clear_screen();
    let summary = client.summary().await?;
    display::display_summary(&summary);
    pause()
}

async fn search_menu(client: &GraphClient) -> Result<()> {
    clear_screen();
    println!("\nSearch options:");
    println!("1. Exact ID search");
    println!("2. Natural language search");

    match prompt("Choose search type (1-2): ")?.as_str() {
        "1" => {
            let term = prompt("\nEnter search term: ")?;
            if term.is_empty() {
                return Ok(());
            }
            let hits: Vec<SearchHit> = client
                .search_nodes(&term, SEARCH_LIMIT)
                .await?
                .into_iter()
                .map(|hit| SearchHit {
                    id: hit.id,
                    labels: hit.labels,
                    matched_terms: Vec::new(),
                })
                .collect();
            display::display_search_results(&hits);
        }
        "2" => {
            run_semantic_search(client).await?;
        }
        _ => {
            println!("\nInvalid choice.");
        }
    }
    pause()
}

async fn show_node(client: &GraphClient) -> Result<()> {
    clear_screen();
    let node_id = prompt("\nEnter node ID: ")?;
    if node_id.is_empty() {
        return Ok(());
    }

    match client.get_node(&node_id).await? {
        Some(node) => {
            display::display_node(&node);
            let rels = client.node_relationships(&node_id).await?;
            display::display_relationships(&rels);
        }
        None => println!("\nNode '{}' not found.", node_id),
    }
    pause()
}

async fn show_paths(client: &GraphClient) -> Result<()> {
    clear_screen();
    let source_id = prompt("\nEnter source node ID: ")?;
    let target_id = prompt("Enter target node ID: ")?;
    if source_id.is_empty() || target_id.is_empty() {
        return Ok(());
    }

    let paths = client.find_paths(&source_id, &target_id, MAX_PATH_HOPS).await?;
    if paths.is_empty() {
        println!("\nNo path found between {} and {}", source_id, target_id);
    } else {
        for path in &paths {
            display::display_path(path);
        }
    }
    pause()
}

async fn show_duplicates(client: &GraphClient) -> Result<()> {
    clear_screen();
    let duplicates = client.duplicate_relationships().await?;
    display::display_duplicates(&duplicates);
    pause()
}

async fn natural_language_search(client: &GraphClient) -> Result<()> {
    clear_screen();
    run_semantic_search(client).await?;
    pause()
}

async fn run_semantic_search(client: &GraphClient) -> Result<()> {
    let query = prompt("\nEnter your natural language query: ")?;
    if query.is_empty() {
        return Ok(());
    }

    let terms = terms::extract_search_terms(&query);
    println!("\nExtracted search terms: {:?}", terms);

    // Empty term set means no query: nothing could match
    let results = client.semantic_search(&terms, SEARCH_LIMIT).await?;
    display::display_search_results(&results);
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn pause() -> Result<()> {
    prompt("\nPress Enter to continue...")?;
    Ok(())
}

fn clear_screen() {
    // ANSI clear + cursor home
    print!("\x1B[2J\x1B[1;1H");
}
