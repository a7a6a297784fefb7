/// Bootstrap SQL with `\ir` includes expanded.
pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

/// Table and index definitions for the article store, used when the store is reset.
pub fn articles_table() -> &'static str {
	include_str!("../../../sql/tables/001_articles.sql")
}

/// Table definition for the interest ledger, used when the ledger is dropped and recreated.
pub fn interest_scores_table() -> &'static str {
	include_str!("../../../sql/tables/002_interest_scores.sql")
}

/// Splits a SQL script into executable statements.
pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_articles.sql" => out.push_str(articles_table()),
				"tables/002_interest_scores.sql" => out.push_str(interest_scores_table()),
				"tables/003_bookmarks.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_bookmarks.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
