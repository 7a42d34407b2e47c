// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use catalog_search::{
    server, BackendKind, CatalogStore, Config, ElasticBackend, MemoryBackend, MySqlCatalog,
    ProductSearch, SearchBackend, SearchRequest, SortMode,
};

mod cli;
use cli::{display, Cli, Commands};

const DEFAULT_LOG_FILTER: &str = "catalog_search=info,tower_http=info";

#[tokio::main]
async fn main() {
    // Logs go to stderr so `search --json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let search = build_search(&cli.config)?;

    match cli.command {
        Commands::Serve => server::serve(Arc::new(search), cli.config.listen)
            .await
            .map_err(|e| format!("server error: {}", e)),
        Commands::Setup { recreate } => run_setup(&search, recreate).await,
        Commands::Search {
            query,
            page,
            limit,
            catid,
            sort,
            explain,
            json,
        } => {
            let mut request = SearchRequest::new(query)
                .page(page.max(1))
                .limit(limit.max(1))
                .sort(SortMode::parse(&sort));
            if let Some(catid) = catid {
                request = request.category(catid);
            }
            // An in-process index starts empty.
            if cli.config.backend == BackendKind::Memory {
                search.warm_up().await;
            }
            run_search(&search, &request, explain, json).await
        }
    }
}

fn build_search(config: &Config) -> Result<ProductSearch, String> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or("no catalog database configured (set --database-url or DATABASE_URL)")?;
    let catalog: Arc<dyn CatalogStore> = Arc::new(
        MySqlCatalog::connect_lazy(database_url, &config.pool_settings()).map_err(|e| e.to_string())?,
    );

    let backend: Arc<dyn SearchBackend> = match config.backend {
        BackendKind::Elasticsearch => Arc::new(
            ElasticBackend::new(&config.elasticsearch_url, config.search_timeout()).map_err(|e| e.to_string())?,
        ),
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
    };

    Ok(ProductSearch::new(catalog, backend, config.settings()))
}

async fn run_setup(search: &ProductSearch, recreate: bool) -> Result<(), String> {
    let outcome = if recreate {
        search.recreate_index().await.map_err(|e| e.to_string())?;
        None
    } else {
        Some(search.ensure_index().await.map_err(|e| e.to_string())?)
    };

    let report = search.sync_all().await.map_err(|e| e.to_string())?;
    display::print_setup(&search.settings().index_name, outcome, &report);
    Ok(())
}

async fn run_search(
    search: &ProductSearch,
    request: &SearchRequest,
    explain: bool,
    json: bool,
) -> Result<(), String> {
    if explain {
        let plan = search.plan(request).await.map_err(|e| e.to_string())?;
        if json {
            println!("{}", plan.compiled.to_dsl());
        } else {
            display::print_plan(&plan);
            let dsl = serde_json::to_string_pretty(&plan.compiled.to_dsl()).map_err(|e| e.to_string())?;
            println!("{}", dsl);
        }
    }

    let start = Instant::now();
    let page = search.search(request).await.map_err(|e| e.to_string())?;
    let elapsed = start.elapsed();

    if json {
        let out = serde_json::to_string_pretty(&page).map_err(|e| e.to_string())?;
        println!("{}", out);
    } else {
        display::print_results(&page, request.page, elapsed);
    }
    Ok(())
}
