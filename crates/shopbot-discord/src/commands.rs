//! Chat commands answered from the catalog tables.
//!
//! Parsing mirrors what users type in the channel: the trimmed message is
//! split on single spaces into at most three parts and the first part,
//! lowercased, selects the command. Messages that are not commands get no
//! reply at all.

use shopbot_core::Catalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    Categories,
    /// `!products` with the optional category argument, lowercased.
    Products { category: Option<String> },
}

#[must_use]
pub fn parse_command(content: &str) -> Option<BotCommand> {
    let mut parts = content.trim().splitn(3, ' ');
    let command = parts.next().unwrap_or_default().to_lowercase();

    match command.as_str() {
        "!help" => Some(BotCommand::Help),
        "!categories" => Some(BotCommand::Categories),
        "!products" => Some(BotCommand::Products {
            category: parts.next().map(str::to_lowercase),
        }),
        _ => None,
    }
}

/// Renders the reply for `command`.
#[must_use]
pub fn respond(catalog: &Catalog, command: &BotCommand) -> String {
    match command {
        BotCommand::Help => [
            "**Available commands:**",
            "`!categories` - Show all product categories",
            "`!products [category]` - Show products in the selected category",
            "`!help` - Display this help",
        ]
        .join("\n"),
        BotCommand::Categories => {
            if catalog.is_empty() {
                "No available categories.".to_string()
            } else {
                format!(
                    "**Available categories:** {}",
                    catalog.category_names().join(", ")
                )
            }
        }
        BotCommand::Products { category: None } => format!(
            "Usage: `!products [category]`\nAvailable categories: {}",
            catalog.category_names().join(", ")
        ),
        BotCommand::Products {
            category: Some(category),
        } => {
            let products = catalog.products_in(category);
            if products.is_empty() {
                format!(
                    "No products found for category: **{category}** or invalid category.\n\
                     Check `!categories` to see available categories."
                )
            } else {
                let lines: Vec<String> = products.iter().map(|p| format!("- {p}")).collect();
                format!(
                    "🛒 **Products in category {category}:**\n{}",
                    lines.join("\n")
                )
            }
        }
    }
}

/// Parses `content` and renders the reply, if it is a command.
#[must_use]
pub fn reply_to(catalog: &Catalog, content: &str) -> Option<String> {
    let command = parse_command(content)?;
    tracing::debug!(?command, "bot command received");
    Some(respond(catalog, &command))
}

#[cfg(test)]
mod tests {
    use shopbot_core::Category;

    use super::*;

    #[test]
    fn parses_commands_case_insensitively() {
        assert_eq!(parse_command("!HELP"), Some(BotCommand::Help));
        assert_eq!(parse_command("  !categories  "), Some(BotCommand::Categories));
        assert_eq!(
            parse_command("!Products Books"),
            Some(BotCommand::Products {
                category: Some("books".to_string())
            })
        );
    }

    #[test]
    fn non_commands_are_ignored() {
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("!unknown"), None);
        assert!(reply_to(&Catalog::builtin(), "just chatting").is_none());
    }

    #[test]
    fn products_argument_stops_at_second_space() {
        assert_eq!(
            parse_command("!products clothing and more"),
            Some(BotCommand::Products {
                category: Some("clothing".to_string())
            })
        );
    }

    #[test]
    fn help_lists_all_commands() {
        let reply = respond(&Catalog::builtin(), &BotCommand::Help);
        assert!(reply.starts_with("**Available commands:**"));
        assert!(reply.contains("`!categories`"));
        assert!(reply.contains("`!products [category]`"));
        assert!(reply.contains("`!help`"));
    }

    #[test]
    fn categories_are_joined_with_commas() {
        let reply = respond(&Catalog::builtin(), &BotCommand::Categories);
        assert_eq!(
            reply,
            "**Available categories:** Electronics, Books, Clothing"
        );
    }

    #[test]
    fn empty_catalog_has_no_categories() {
        let catalog = Catalog { categories: vec![] };
        assert_eq!(
            respond(&catalog, &BotCommand::Categories),
            "No available categories."
        );
    }

    #[test]
    fn products_without_category_prints_usage() {
        let reply = reply_to(&Catalog::builtin(), "!products").expect("reply");
        assert_eq!(
            reply,
            "Usage: `!products [category]`\nAvailable categories: Electronics, Books, Clothing"
        );
    }

    #[test]
    fn products_lists_category_items() {
        let reply = reply_to(&Catalog::builtin(), "!products BOOKS").expect("reply");
        assert_eq!(
            reply,
            "🛒 **Products in category books:**\n- Novel\n- Biography\n- Fantasy"
        );
    }

    #[test]
    fn unknown_category_points_to_categories_command() {
        let reply = reply_to(&Catalog::builtin(), "!products toys").expect("reply");
        assert!(reply.starts_with("No products found for category: **toys** or invalid category."));
        assert!(reply.ends_with("Check `!categories` to see available categories."));
    }

    #[test]
    fn category_without_products_counts_as_not_found() {
        let catalog = Catalog {
            categories: vec![Category {
                name: "Groceries".to_string(),
                products: vec![],
            }],
        };
        let reply = reply_to(&catalog, "!products groceries").expect("reply");
        assert!(reply.starts_with("No products found for category: **groceries**"));
    }
}
