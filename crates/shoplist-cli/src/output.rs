//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use shoplist_core::models::User;
use shoplist_core::{Category, Entity, ListItem, Product, Purchase, ShoppingList};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a listing: one line per entity, a JSON array or bare ids
    fn print_entities<T, F>(&self, entities: &[T], (noun, plural): (&str, &str), line: F)
    where
        T: Entity + Serialize,
        F: Fn(&T) -> String,
    {
        match self.format {
            OutputFormat::Human => {
                if entities.is_empty() {
                    println!("No {} found.", plural);
                    return;
                }
                for entity in entities {
                    println!("{}", line(entity));
                }
                let noun = if entities.len() == 1 { noun } else { plural };
                println!("\n{} {}", entities.len(), noun);
            }
            OutputFormat::Json => print_json(entities),
            OutputFormat::Quiet => {
                for entity in entities {
                    println!("{}", entity.id());
                }
            }
        }
    }

    pub fn print_products(&self, products: &[Product]) {
        self.print_entities(products, ("product", "products"), |p| {
            format!(
                "{:>6} | {} | {}",
                p.id,
                pad(&truncate(&p.name, 35), 35),
                truncate(&p.category.name, 25)
            )
        });
    }

    pub fn print_categories(&self, categories: &[Category]) {
        self.print_entities(categories, ("category", "categories"), |c| {
            format!("{:>6} | {}", c.id, truncate(&c.name, 50))
        });
    }

    pub fn print_lists(&self, lists: &[ShoppingList]) {
        self.print_entities(lists, ("list", "lists"), |l| {
            let mut flags = Vec::new();
            if l.recurring {
                flags.push("recurring");
            }
            if l.is_shared() {
                flags.push("shared");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            format!("{:>6} | {}{}", l.id, truncate(&l.name, 40), flags)
        });
    }

    /// Print a single shopping list
    pub fn print_list(&self, list: &ShoppingList) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", list.id);
                println!("Name:        {}", list.name);
                if let Some(ref desc) = list.description {
                    println!("Description: {}", desc);
                }
                println!("Recurring:   {}", if list.recurring { "yes" } else { "no" });
                if let Some(ref owner) = list.owner {
                    println!("Owner:       {}", owner.full_name());
                }
                if let Some(at) = list.last_purchased_at {
                    println!("Purchased:   {}", at.format("%Y-%m-%d %H:%M"));
                }
            }
            OutputFormat::Json => print_json(list),
            OutputFormat::Quiet => println!("{}", list.id),
        }
    }

    pub fn print_items(&self, items: &[ListItem]) {
        self.print_entities(items, ("item", "items"), |i| {
            format!(
                "[{}] {:>6} | {} | {}",
                if i.purchased { "x" } else { " " },
                i.id,
                pad(&truncate(&i.product.name, 35), 35),
                quantity_label(i)
            )
        });
    }

    pub fn print_purchases(&self, purchases: &[Purchase]) {
        self.print_entities(purchases, ("purchase", "purchases"), |p| {
            let date = p
                .created_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "----------".to_string());
            format!(
                "{:>6} | {} | {} | {} item(s)",
                p.id,
                date,
                pad(&truncate(&p.list.name, 35), 35),
                p.items.len()
            )
        });
    }

    pub fn print_users(&self, users: &[User]) {
        self.print_entities(users, ("user", "users"), |u| {
            format!("{:>6} | {} <{}>", u.id, u.full_name(), u.email)
        });
    }

    /// Print a single user profile
    pub fn print_user(&self, user: &User) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", user.id);
                println!("Name:    {}", user.full_name());
                println!("Email:   {}", user.email);
                if let Some(at) = user.created_at {
                    println!("Since:   {}", at.format("%Y-%m-%d"));
                }
            }
            OutputFormat::Json => print_json(user),
            OutputFormat::Quiet => println!("{}", user.id),
        }
    }

    /// Note that the listing stopped before the last page
    pub fn more_available(&self, has_more: bool) {
        if has_more && self.format == OutputFormat::Human {
            println!("More results available; use --all to load every page.");
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON output: {}", e),
    }
}

/// "2 Kg", "1 U"
fn quantity_label(item: &ListItem) -> String {
    match item.unit_label() {
        Some(unit) => format!("{} {}", item.quantity, unit),
        None => item.quantity.to_string(),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}
