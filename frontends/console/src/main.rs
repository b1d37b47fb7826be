use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use console_frontend::config::AppConfig;
use console_frontend::pages::{CategoriesPage, ProductsPage};
use console_frontend::routes::Route;

use shopfront::{CategoryService, ProductService, ResourceBackend, ResourceService};
use shopfront_api::{Category, Product};
use shopfront_rest::{RestBackend, RestClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Default to INFO, overridable with RUST_LOG. Logs go to stderr so
    // stdout stays free for the command loop.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = resolve_config();
    info!(
        "starting with categories={} products={}",
        config.api.categories, config.api.products
    );

    let client = Arc::new(RestClient::new(Duration::from_secs(
        config.request_timeout_secs,
    )));

    let category_backend: Arc<dyn ResourceBackend<Category>> =
        Arc::new(RestBackend::new(Arc::clone(&client), &config.api.categories));
    let product_backend: Arc<dyn ResourceBackend<Product>> =
        Arc::new(RestBackend::new(client, &config.api.products));

    // One service per entity type for the whole session; each performs
    // its initial fetch here.
    let categories: Arc<CategoryService> = ResourceService::init(category_backend).await;
    let products: Arc<ProductService> = ResourceService::init(product_backend).await;

    let categories_page = CategoriesPage::new(Arc::clone(&categories));
    let products_page = ProductsPage::new(products, &categories);

    run_shell(categories_page, products_page).await
}

/// Resolution order: `--config <path>` argument, `SHOPFRONT_CONFIG`
/// environment variable, `~/.config/shopfront/config.yaml`, compiled-in
/// defaults.
fn resolve_config() -> AppConfig {
    let mut args = std::env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            if let Some(path) = args.next() {
                config_path = Some(PathBuf::from(path));
            }
        }
    }

    if config_path.is_none() {
        if let Ok(env_path) = std::env::var("SHOPFRONT_CONFIG") {
            config_path = Some(PathBuf::from(env_path));
        }
    }

    if config_path.is_none() {
        if let Some(home) = std::env::var_os("HOME") {
            let mut default_path = PathBuf::from(home);
            default_path.push(".config");
            default_path.push("shopfront");
            default_path.push("config.yaml");
            if default_path.exists() {
                config_path = Some(default_path);
            }
        }
    }

    match config_path {
        Some(path) => AppConfig::load_from_file(&path).unwrap_or_else(|e| {
            eprintln!("Warning: {}, using defaults", e);
            AppConfig::default()
        }),
        None => AppConfig::default(),
    }
}

/// Line-oriented shell over the two pages. Each command maps to one
/// page action, so the flow is the usual one: user action, service
/// call, cache mutation, re-render from the cache.
async fn run_shell(mut categories: CategoriesPage, mut products: ProductsPage) -> Result<()> {
    let stdin = std::io::stdin();
    let mut route = Route::Home;
    print_home();

    loop {
        print!("{}> ", route.path());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let rest = parts.collect::<Vec<_>>().join(" ");

        match command {
            "quit" | "exit" => break,
            "go" => match Route::from_path(rest.trim()) {
                Some(next) => {
                    route = next;
                    if route == Route::Home {
                        print_home();
                    }
                }
                None => println!("unknown route: {}", rest.trim()),
            },
            "help" => print_help(route),
            _ => match route {
                Route::Home => print_home(),
                Route::Categories => categories_command(&mut categories, command, &rest).await,
                Route::Products => products_command(&mut products, command, &rest).await,
            },
        }
    }

    Ok(())
}

fn print_home() {
    println!("shopfront console. Routes: /categories /products");
    println!("Use 'go <route>' to navigate, 'help' for commands, 'quit' to leave.");
}

fn print_help(route: Route) {
    match route {
        Route::Home => print_home(),
        Route::Categories => {
            println!("list | new | set name <text> | set desc <text> | edit <id> | save | del <id> | refresh | clear");
        }
        Route::Products => {
            println!("list | new | set name <text> | set desc <text> | set price <n> | set category <id> | edit <id> | save | del <id> | refresh | clear");
        }
    }
}

fn report_outcome(error: Option<String>) {
    match error {
        Some(message) => println!("error: {}", message),
        None => println!("ok"),
    }
}

async fn categories_command(page: &mut CategoriesPage, command: &str, rest: &str) {
    match command {
        "list" => {
            for category in page.categories() {
                println!(
                    "{:>4}  {:<24} {}",
                    category.id.unwrap_or_default(),
                    category.name,
                    category.description
                );
            }
            if page.is_loading() {
                println!("(loading)");
            }
        }
        "new" => page.reset_form(),
        "set" => {
            let (field, value) = split_field(rest);
            match field {
                "name" => page.form.name = value.to_string(),
                "desc" => page.form.description = value.to_string(),
                _ => println!("unknown field: {}", field),
            }
        }
        "edit" => match find_category(page, rest) {
            Some(category) => page.edit(&category),
            None => println!("no category with id {}", rest),
        },
        "save" => {
            page.save().await;
            report_outcome(page.error_message());
        }
        "del" => match rest.trim().parse() {
            Ok(id) => {
                page.delete(id).await;
                report_outcome(page.error_message());
            }
            Err(_) => println!("usage: del <id>"),
        },
        "refresh" => page.refresh().await,
        "clear" => page.clear_error(),
        _ => println!("unknown command: {} (try 'help')", command),
    }
}

async fn products_command(page: &mut ProductsPage, command: &str, rest: &str) {
    match command {
        "list" => {
            for product in page.products() {
                println!(
                    "{:>4}  {:<24} {:>8.2}  {}",
                    product.id.unwrap_or_default(),
                    product.name,
                    product.price,
                    page.category_name(product.category_id)
                );
            }
            if page.is_loading() || page.categories_loading() {
                println!("(loading)");
            }
        }
        "new" => page.reset_form(),
        "set" => {
            let (field, value) = split_field(rest);
            match field {
                "name" => page.form.name = value.to_string(),
                "desc" => page.form.description = value.to_string(),
                "price" => page.form.price = value.trim().parse().unwrap_or(0.0),
                "category" => page.set_category_id(value),
                _ => println!("unknown field: {}", field),
            }
        }
        "edit" => match find_product(page, rest) {
            Some(product) => page.edit(&product),
            None => println!("no product with id {}", rest),
        },
        "save" => {
            page.save().await;
            report_outcome(page.error_message());
        }
        "del" => match rest.trim().parse() {
            Ok(id) => {
                page.delete(id).await;
                report_outcome(page.error_message());
            }
            Err(_) => println!("usage: del <id>"),
        },
        "refresh" => page.refresh().await,
        "clear" => page.clear_error(),
        _ => println!("unknown command: {} (try 'help')", command),
    }
}

fn split_field(rest: &str) -> (&str, &str) {
    match rest.split_once(' ') {
        Some((field, value)) => (field, value.trim()),
        None => (rest.trim(), ""),
    }
}

fn find_category(page: &CategoriesPage, rest: &str) -> Option<Category> {
    let id: i64 = rest.trim().parse().ok()?;
    page.categories().into_iter().find(|c| c.id == Some(id))
}

fn find_product(page: &ProductsPage, rest: &str) -> Option<Product> {
    let id: i64 = rest.trim().parse().ok()?;
    page.products().into_iter().find(|p| p.id == Some(id))
}
