//! Leveling spot lookup.
//!
//! `leveling <level> [bonus exp]` scrapes a public leveling table and
//! answers with the recommended bosses for that level.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::reply;
use crate::bot::dispatcher::AppState;
use crate::gateway::InboundMessage;
use crate::i18n::{get_text, get_text_with};
use crate::utils::is_digits;

/// Source of leveling table pages.
#[async_trait]
pub trait LevelingSource: Send + Sync {
    /// Fetch the raw HTML page for a level and bonus EXP.
    async fn fetch(&self, level: &str, bonus_exp: &str) -> anyhow::Result<String>;
}

/// HTTP client for the public leveling table.
pub struct LevelingClient {
    client: Client,
    url: Url,
    gap: u32,
}

impl LevelingClient {
    pub fn new(url: &str, gap: u32) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url: Url::parse(url)?,
            gap,
        })
    }

    fn page_url(&self, level: &str, bonus_exp: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("lv", level)
            .append_pair("gap", &self.gap.to_string())
            .append_pair("bonusEXP", bonus_exp);
        url
    }
}

#[async_trait]
impl LevelingSource for LevelingClient {
    async fn fetch(&self, level: &str, bonus_exp: &str) -> anyhow::Result<String> {
        let url = self.page_url(level, bonus_exp);
        debug!("Fetching leveling page {}", url);

        let html = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(html)
    }
}

/// One row of the leveling table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRecord {
    pub level: String,
    pub boss_name: String,
    pub location: String,
    pub exp_full_break: String,
    pub exp_no_break: String,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static ROW: Lazy<Selector> = Lazy::new(|| selector(".level-row"));
static LEVEL: Lazy<Selector> = Lazy::new(|| selector(".level-col-1 > b"));
static BOSS: Lazy<Selector> = Lazy::new(|| selector(".level-col-2 > p:nth-child(1) > b > a"));
static LOCATION: Lazy<Selector> = Lazy::new(|| selector(".level-col-2 > p:nth-child(2)"));
static FULL_BREAK: Lazy<Selector> = Lazy::new(|| selector(".level-col-3 > p:nth-child(1) > b"));
static NO_BREAK: Lazy<Selector> = Lazy::new(|| selector(".level-col-3 > p:nth-child(4)"));

/// Trimmed text of every element under `row` matching `sel`.
fn select_text(row: &ElementRef<'_>, sel: &Selector) -> String {
    row.select(sel)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Extract level records from a leveling page.
///
/// Rows without a full-break EXP value are skipped.
pub fn parse_levels(html: &str) -> Vec<LevelRecord> {
    let document = Html::parse_document(html);

    document
        .select(&ROW)
        .filter_map(|row| {
            let exp_full_break = select_text(&row, &FULL_BREAK);
            if exp_full_break.is_empty() {
                return None;
            }

            Some(LevelRecord {
                level: select_text(&row, &LEVEL),
                boss_name: select_text(&row, &BOSS),
                location: select_text(&row, &LOCATION),
                exp_full_break,
                exp_no_break: select_text(&row, &NO_BREAK),
            })
        })
        .collect()
}

/// Validate `<level> [bonus]`, defaulting bonus to `0`.
///
/// On failure returns the i18n key of the message to send.
pub fn parse_args(args: &[String]) -> Result<(String, String), &'static str> {
    if args.is_empty() || args.len() > 2 {
        return Err("leveling.usage");
    }

    let level = args[0].clone();
    let bonus_exp = args.get(1).cloned().unwrap_or_else(|| "0".to_string());

    if !is_digits(&level) || !is_digits(&bonus_exp) {
        return Err("leveling.not_numeric");
    }

    Ok((level, bonus_exp))
}

/// Render records into one chat message.
pub fn format_levels(locale: &str, level: &str, bonus_exp: &str, records: &[LevelRecord]) -> String {
    let line = |key: &str, value: &str| get_text_with(locale, key, &[("value", value)]);
    let divider = get_text(locale, "leveling.divider");

    let mut text = get_text_with(
        locale,
        "leveling.header",
        &[("level", level), ("bonus", bonus_exp)],
    );
    text.push('\n');

    for record in records {
        text.push('\n');
        text.push_str(&divider);
        text.push('\n');
        for (key, value) in [
            ("leveling.boss", &record.boss_name),
            ("leveling.level", &record.level),
            ("leveling.location", &record.location),
            ("leveling.full_break", &record.exp_full_break),
            ("leveling.no_break", &record.exp_no_break),
        ] {
            text.push_str(&line(key, value));
            text.push('\n');
        }
    }

    text
}

/// Build the reply for a leveling request. Never fails.
pub async fn leveling_reply(source: &dyn LevelingSource, locale: &str, args: &[String]) -> String {
    let (level, bonus_exp) = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(key) => return get_text(locale, key),
    };

    let html = match source.fetch(&level, &bonus_exp).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Leveling lookup for level {} failed: {:#}", level, e);
            return get_text_with(locale, "leveling.error", &[("error", &e.to_string())]);
        }
    };

    let records = parse_levels(&html);
    debug!("Parsed {} leveling rows for level {}", records.len(), level);

    if records.is_empty() {
        return get_text_with(
            locale,
            "leveling.no_results",
            &[("level", &level), ("bonus", &bonus_exp)],
        );
    }

    format_levels(locale, &level, &bonus_exp, &records)
}

/// Handle `leveling` - one reply per invocation.
pub async fn leveling_command(
    state: &AppState,
    msg: &InboundMessage,
    args: &[String],
) -> anyhow::Result<()> {
    let text = leveling_reply(state.leveling.as_ref(), &state.locale, args).await;
    reply(state, msg, &text).await
}
