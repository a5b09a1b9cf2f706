use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::path::PathBuf;

use smedash::api::ArticleFilter;
use smedash::config::{DashboardConfig, DEFAULT_CLUSTER_COUNT};
use smedash::dashboard::{
    ArticleDetailPage, ArticlesPage, ArticlesView, ClustersPage, ClustersView, NetworkPage, NetworkView,
    OverviewPage, OverviewView, ProblemsPage, ProblemsView, SentimentPage, SentimentView,
};
use smedash::environment::get_env_var;
use smedash::logging::configure_logging;
use smedash::view::{AnalysisSection, ArticleCard, ArticleDetailView, SentimentDetail, SentimentLabel};
use smedash::{Dashboard, PageView};

#[derive(Parser)]
#[clap(name = "smedash", about = "Terminal dashboard for the SME news analytics API")]
struct Cli {
    /// Base URL of the analytics API (overrides SMEDASH_API_URL)
    #[clap(long, global = true)]
    api_url: Option<String>,

    /// Articles per page (overrides SMEDASH_PER_PAGE)
    #[clap(long, global = true)]
    per_page: Option<u32>,

    /// Print the view model as JSON instead of tables
    #[clap(long, global = true)]
    json: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Corpus statistics, sentiment overview and top domains
    Overview,

    /// Browse articles page by page
    Articles {
        /// Page number, starting at 1
        #[clap(short, long, default_value = "1")]
        page: u32,

        /// Only articles from this domain
        #[clap(short, long)]
        domain: Option<String>,

        /// Only SME-related (true) or unrelated (false) articles
        #[clap(long)]
        sme: Option<bool>,

        /// Search instead of listing (at least 3 characters)
        #[clap(short, long)]
        search: Option<String>,
    },

    /// Show one article with its analysis
    Article {
        /// Article ID
        #[clap(required = true)]
        id: String,
    },

    /// Full-text article search
    Search {
        /// Query text
        #[clap(required = true)]
        query: String,

        /// Only SME-related (true) or unrelated (false) articles
        #[clap(long)]
        sme: Option<bool>,
    },

    /// Corpus sentiment breakdown
    Sentiment,

    /// SME problem categories
    Problems,

    /// Topic clusters
    Clusters {
        /// Number of clusters to request
        #[clap(short, long, default_value_t = DEFAULT_CLUSTER_COUNT)]
        k: u32,
    },

    /// Article/problem relationship network
    Network,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Logging first so configuration warnings are captured
    let log_dir = get_env_var("SMEDASH_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| DashboardConfig::default().log_dir);
    configure_logging(&log_dir);

    let mut config = DashboardConfig::from_env();
    if let Some(api_url) = &args.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(per_page) = args.per_page {
        config = config.with_per_page(per_page);
    }

    let dashboard = Dashboard::new(config)?;
    let result = run(&dashboard, args.command, args.json).await;
    dashboard.shutdown();
    result
}

async fn run(dashboard: &Dashboard, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Overview => {
            let view = OverviewPage::new(dashboard).load().await;
            present(view, json, render_overview)
        }
        Commands::Articles {
            page,
            domain,
            sme,
            search,
        } => {
            let mut articles = ArticlesPage::new(dashboard);
            articles.set_filter(article_filter(domain.as_deref(), sme));
            articles.set_page(page);
            if let Some(query) = search {
                articles.set_query(&query);
            }
            present(articles.load().await, json, render_articles)
        }
        Commands::Article { id } => {
            let view = ArticleDetailPage::new(dashboard, &id).load().await;
            present(view, json, render_article)
        }
        Commands::Search { query, sme } => {
            let mut articles = ArticlesPage::new(dashboard);
            articles.set_filter(article_filter(None, sme));
            articles.set_query(&query);
            let view = articles.load().await;
            if view.data().is_some_and(|view| !view.searching) {
                println!(
                    "{}",
                    format!(
                        "Queries need at least {} characters; no search was run",
                        dashboard.config().search_min_chars
                    )
                    .dimmed()
                );
                return Ok(());
            }
            present(view, json, render_articles)
        }
        Commands::Sentiment => {
            let view = SentimentPage::new(dashboard).load().await;
            present(view, json, render_sentiment)
        }
        Commands::Problems => {
            let view = ProblemsPage::new(dashboard).load().await;
            present(view, json, render_problems)
        }
        Commands::Clusters { k } => {
            let mut clusters = ClustersPage::new(dashboard);
            let view = if k == clusters.cluster_count() {
                clusters.load().await
            } else {
                match clusters.set_cluster_count(k).await {
                    Some(view) => view,
                    None => bail!(
                        "cluster count must be one of {:?}",
                        dashboard.config().cluster_choices
                    ),
                }
            };
            present(view, json, render_clusters)
        }
        Commands::Network => {
            let view = NetworkPage::new(dashboard).load().await;
            present(view, json, render_network)
        }
    }
}

fn article_filter(domain: Option<&str>, sme: Option<bool>) -> ArticleFilter {
    let mut filter = ArticleFilter::default();
    if let Some(domain) = domain {
        filter = filter.domain(domain);
    }
    if let Some(sme) = sme {
        filter = filter.sme_related(sme);
    }
    filter
}

/// Render a page outcome. Failures are reported and returned as errors.
fn present<T: Serialize>(view: PageView<T>, json: bool, render: fn(&T)) -> Result<()> {
    match view {
        PageView::Ready(data) | PageView::Refreshing(data) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                render(&data);
            }
            Ok(())
        }
        PageView::Idle => {
            println!("{}", "Nothing to show".dimmed());
            Ok(())
        }
        PageView::Loading => {
            println!("{}", "Still loading".dimmed());
            Ok(())
        }
        PageView::Failed(err) => {
            if err.is_not_found() {
                eprintln!("{}", "Not found".bright_red().bold());
                eprintln!("Run `smedash articles` to go back to the article list.");
            } else {
                eprintln!("{}", "Failed to load".bright_red().bold());
                eprintln!("Run `smedash overview` once the API is reachable.");
            }
            Err(err.into())
        }
        PageView::Invalid(err) => {
            eprintln!("{}", "Invalid data".bright_yellow().bold());
            Err(err.into())
        }
    }
}

fn heading(title: &str) {
    println!("\n{}", title.bright_blue().bold());
    println!("{}", "─".repeat(80).dimmed());
}

fn paint(label: SentimentLabel) -> ColoredString {
    match label {
        SentimentLabel::Positive => label.name().bright_green(),
        SentimentLabel::Negative => label.name().bright_red(),
        SentimentLabel::Neutral => label.name().normal(),
    }
}

fn key_value_table(rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    for (key, value) in rows {
        table.add_row(Row::new(vec![Cell::new(key), Cell::new(value)]));
    }
    table
}

fn render_overview(view: &OverviewView) {
    heading("Dashboard Overview");
    let rows: Vec<(&str, String)> = view
        .cards
        .iter()
        .map(|card| (card.title, card.value.clone()))
        .collect();
    key_value_table(&rows).printstd();
    println!("{}: {}", "Avg News Score".bright_blue(), view.news_quality);

    heading("Sentiment Overview");
    match &view.sentiment {
        Some(card) => {
            println!(
                "{}: {} ({})",
                "Average Sentiment".bright_blue(),
                card.mean_compound,
                paint(card.label)
            );
            for slice in &view.distribution {
                println!("  {:<10} {}", paint(slice.label), slice.count);
            }
        }
        None => println!("{}", "Sentiment not available".dimmed()),
    }

    heading("Top Domains");
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Domain"), Cell::new("Articles")]));
    for domain in &view.top_domains {
        table.add_row(Row::new(vec![
            Cell::new(&domain.domain),
            Cell::new(&domain.count.to_string()),
        ]));
    }
    table.printstd();
}

fn render_article_cards(cards: &[ArticleCard]) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Title"),
        Cell::new("Domain"),
        Cell::new("Date"),
        Cell::new("Words"),
        Cell::new("Score"),
        Cell::new("SME"),
    ]));
    for card in cards {
        table.add_row(Row::new(vec![
            Cell::new(&card.id),
            Cell::new(&card.title),
            Cell::new(&card.domain),
            Cell::new(card.date.as_deref().unwrap_or("")),
            Cell::new(&card.word_count.to_string()),
            Cell::new(card.score.as_ref().map(|s| s.text.as_str()).unwrap_or("")),
            Cell::new(if card.is_sme_related { "yes" } else { "" }),
        ]));
    }
    table.printstd();
}

fn render_articles(view: &ArticlesView) {
    if view.searching {
        heading(&format!("Search results for \"{}\"", view.query));
    } else {
        heading("Articles");
    }
    if view.articles.is_empty() {
        println!("{}", "No articles".dimmed());
    } else {
        render_article_cards(&view.articles);
    }
    if let Some(pagination) = &view.pagination {
        let previous = if pagination.has_previous { "< Previous" } else { "" };
        let next = if pagination.has_next { "Next >" } else { "" };
        println!("{}  {}  {}", previous, pagination.label.bright_blue(), next);
    }
}

fn sentiment_lines(detail: &SentimentDetail) {
    println!(
        "{}: {} ({})",
        "Sentiment".bright_blue(),
        paint(detail.label),
        detail.compound
    );
    println!(
        "  Positive {}  Neutral {}  Negative {}",
        detail.positive, detail.neutral, detail.negative
    );
}

fn render_article(view: &ArticleDetailView) {
    heading(&view.title);
    let mut rows = vec![
        ("URL", view.url.clone()),
        ("Domain", view.domain.clone()),
        ("Published", view.date.clone().unwrap_or_default()),
        ("Words", view.word_count.to_string()),
        ("SME related", if view.is_sme_related { "yes" } else { "no" }.to_string()),
        ("News score", view.news_score.clone()),
    ];
    if !view.problems.is_empty() {
        rows.push(("Problems", view.problems.join(", ")));
    }
    key_value_table(&rows).printstd();

    if let Some(detail) = &view.sentiment {
        sentiment_lines(detail);
    }

    heading("Analysis");
    match &view.analysis {
        AnalysisSection::Deep(deep) => {
            if let Some(summary) = &deep.summary {
                println!("{}", summary);
            }
            if let Some(label) = deep.overall {
                println!("{}: {}", "Overall".bright_blue(), paint(label));
            }
            for entity in &deep.entities {
                println!("  {:<30} {:>7} {}", entity.entity, entity.score, paint(entity.label));
            }
            for (tone, intensity) in &deep.tones {
                println!("  {:<30} {:>7}", tone, intensity);
            }
            for implication in &deep.sme_implications {
                println!("  • {}", implication);
            }
        }
        AnalysisSection::Basic { note, sentiment } => {
            println!("{}", note.dimmed());
            match sentiment {
                Some(detail) => sentiment_lines(detail),
                None => println!("{}", "No sentiment scores".dimmed()),
            }
        }
    }

    heading("Content");
    println!("{}", view.content);
}

fn render_sentiment(view: &SentimentView) {
    heading("Sentiment Analysis");
    println!(
        "{}: {} ({})",
        "Average Sentiment".bright_blue(),
        view.overall.mean_compound,
        paint(view.overall.label)
    );
    for slice in &view.distribution {
        println!("  {:<10} {}", paint(slice.label), slice.count);
    }
    if let Some(sme) = &view.sme_related {
        println!(
            "{}: {} ({}) across {} articles",
            "SME Sentiment".bright_blue(),
            sme.mean_compound,
            paint(sme.label),
            sme.total
        );
    }

    heading("Articles");
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Title"),
        Cell::new("Label"),
        Cell::new("Compound"),
        Cell::new("Pos"),
        Cell::new("Neu"),
        Cell::new("Neg"),
        Cell::new("SME"),
    ]));
    for row in &view.articles {
        table.add_row(Row::new(vec![
            Cell::new(&row.title),
            Cell::new(row.label.name()),
            Cell::new(&row.compound),
            Cell::new(&row.pos),
            Cell::new(&row.neu),
            Cell::new(&row.neg),
            Cell::new(if row.is_sme_related { "yes" } else { "" }),
        ]));
    }
    table.printstd();
}

fn render_problems(view: &ProblemsView) {
    heading("SME Problem Analysis");
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Problem"),
        Cell::new("All Articles"),
        Cell::new("SME Related"),
    ]));
    for bar in &view.bars {
        table.add_row(Row::new(vec![
            Cell::new(&bar.label),
            Cell::new(&bar.all_articles.to_string()),
            Cell::new(&bar.sme_related.to_string()),
        ]));
    }
    table.printstd();
    println!(
        "{}: {}% ({} of {} articles with problems are SME related)",
        "SME Coverage".bright_blue(),
        view.totals.coverage_percentage,
        view.totals.sme_articles_with_problems,
        view.totals.total_articles_with_problems
    );

    for list in &view.lists {
        heading(&format!("{} ({})", list.label, list.total));
        for article in &list.articles {
            println!("  {} {}", article.article_id.dimmed(), article.title);
        }
        if let Some(more) = &list.more {
            println!("  {}", more.dimmed());
        }
    }
}

fn render_clusters(view: &ClustersView) {
    heading(&format!("Article Clustering ({} clusters)", view.n_clusters));
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Cluster"),
        Cell::new("Size"),
        Cell::new("Top Term"),
    ]));
    for bar in &view.bars {
        table.add_row(Row::new(vec![
            Cell::new(&bar.label),
            Cell::new(&bar.size.to_string()),
            Cell::new(&bar.top_term),
        ]));
    }
    table.printstd();

    for card in &view.cards {
        heading(&format!("{} ({} articles)", card.label, card.size));
        println!("{}: {}", "Key Topics".bright_blue(), card.terms.join(", "));
        for article in &card.sample_articles {
            println!("  {}", article.title);
        }
        if let Some(more) = &card.more {
            println!("  {}", more.dimmed());
        }
    }
}

fn render_network(view: &NetworkView) {
    heading("Network Analysis");
    key_value_table(&[
        ("Nodes", view.summary.nodes.to_string()),
        ("Edges", view.summary.edges.to_string()),
        ("Density", view.summary.density.clone()),
        ("Components", view.summary.connected_components.to_string()),
    ])
    .printstd();

    let types: Vec<String> = view.node_types.iter().map(|t| t.to_string()).collect();
    println!("{}: {}", "Node Types".bright_blue(), types.join(", "));

    heading("Connection Types");
    for connection in &view.connections {
        println!("  {:<30} {}", connection.label, connection.count);
    }

    heading("Most Connected Articles");
    for node in &view.top_articles {
        println!("  {:>4} connections  {}", node.degree, node.label);
    }

    heading("Problem Categories");
    for node in &view.problems {
        println!("  {:>4} connections  {}", node.degree, node.label);
    }

    heading("Graph Metrics");
    match &view.metrics {
        Some(metrics) => {
            key_value_table(&[
                ("Avg Clustering", metrics.average_clustering.clone()),
                ("Assortativity", metrics.assortativity.clone()),
                ("Article Avg Degree Centrality", metrics.article_avg_degree.clone()),
                ("Article Max Closeness", metrics.article_max_closeness.clone()),
                ("Problem Avg Degree Centrality", metrics.problem_avg_degree.clone()),
                ("Problem Max Closeness", metrics.problem_max_closeness.clone()),
                ("Communities", metrics.communities.to_string()),
            ])
            .printstd();
            println!("{}", "Top PageRank Nodes".bright_blue());
            for node in &view.pagerank {
                let kind = node
                    .node_type
                    .as_ref()
                    .map(|t| t.to_string())
                    .unwrap_or_default();
                println!("  #{} {} {} {}", node.rank, node.label, kind.dimmed(), node.score);
            }
        }
        None => println!("{}", "N/A".dimmed()),
    }
}
