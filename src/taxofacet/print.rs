use chrono::{DateTime, Utc};
use colored::*;
use taxofacet::attributes::{AttributeField, FieldVariant, SchemaSource};
use taxofacet::model::{CategoryPath, Listing};
use taxofacet::session::ResultSet;
use taxofacet::taxonomy::TaxonomyTree;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const PRICE_WIDTH: usize = 14;
const TIME_WIDTH: usize = 16;
const PROMOTED_MARKER: &str = "★";

pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

pub fn print_tree(tree: &TaxonomyTree, with_schemas: bool) {
    for (path, node) in tree.walk() {
        let indent = "  ".repeat(path.depth().saturating_sub(1));
        let name = match path.depth() {
            1 => node.name.bold(),
            _ => node.name.normal(),
        };
        let count = tree.children(&path).len();
        if count > 0 {
            println!("{}{} {}", indent, name, format!("({})", count).dimmed());
        } else {
            println!("{}{}", indent, name);
        }
        if with_schemas {
            if let Some(fields) = &node.schema {
                let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                println!("{}  {}", indent, format!("[{}]", names.join(", ")).cyan());
            }
        }
    }
}

pub fn print_schema(path: &CategoryPath, fields: &[AttributeField], source: SchemaSource) {
    let origin = match source {
        SchemaSource::Subsubcategory => "subsubcategory schema",
        SchemaSource::Subcategory => "subcategory schema",
        SchemaSource::Fallback => "no schema",
    };
    println!("{} {}", path.to_string().bold(), format!("({})", origin).dimmed());

    if fields.is_empty() {
        println!("{}", "No attribute fields.".dimmed());
        return;
    }

    let name_width = fields.iter().map(|f| f.name.width()).max().unwrap_or(0);
    for field in fields {
        let required = if field.required { "*".red() } else { " ".normal() };
        let kind = format!("{:<8}", field.kind().as_str());
        let padding = " ".repeat(name_width - field.name.width());
        let mut line = format!(
            "  {}{}{}  {}  {}",
            required,
            field.name,
            padding,
            kind.cyan(),
            field.label
        );
        if let FieldVariant::Select { options } = &field.variant {
            line.push_str(&format!("  {}", options.join(" | ").dimmed()));
        }
        println!("{}", line);
    }
}

pub fn print_results(results: &ResultSet) {
    if results.listings.is_empty() {
        println!("No listings found.");
        return;
    }

    for (i, listing) in results.listings.iter().enumerate() {
        print_listing(i + 1, listing);
    }

    let info = &results.page_info;
    println!();
    println!(
        "{}",
        format!(
            "Showing {} of {} (page {} of {}){}",
            results.listings.len(),
            info.total,
            info.page,
            info.total_pages.max(1),
            if info.has_more { ", more available" } else { "" }
        )
        .dimmed()
    );
}

fn print_listing(index: usize, listing: &Listing) {
    let idx = format!("{:>3}. ", index);
    let marker = if listing.promoted {
        format!("{} ", PROMOTED_MARKER)
    } else {
        "  ".to_string()
    };
    let price = format!(
        "{:>width$}",
        format!("{} {}", format_price(listing.price), listing.currency),
        width = PRICE_WIDTH
    );
    let time_ago = format_time_ago(listing.created_at);

    let fixed = idx.width() + marker.width() + PRICE_WIDTH + TIME_WIDTH + 2;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let title = truncate_to_width(&format!("{} · {}", listing.title, listing.location), available);
    let padding = available.saturating_sub(title.width());

    let marker = if listing.promoted {
        marker.yellow()
    } else {
        marker.normal()
    };
    println!(
        "{}{}{}{} {} {}",
        idx.dimmed(),
        marker,
        title,
        " ".repeat(padding),
        price.green(),
        time_ago.dimmed()
    );

    if !listing.attributes.is_empty() {
        let attrs: Vec<String> = listing
            .attributes
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let line = truncate_to_width(&attrs.join("  "), LINE_WIDTH - 7);
        println!("       {}", line.dimmed());
    }
}

fn format_price(price: f64) -> String {
    let whole = price.trunc() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if whole < 0 {
        grouped.insert(0, '-');
    }
    let cents = ((price.fract().abs()) * 100.0).round() as i64;
    if cents > 0 {
        format!("{},{:02}", grouped, cents)
    } else {
        grouped
    }
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
