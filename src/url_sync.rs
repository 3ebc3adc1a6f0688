use crate::error::Result;
use crate::selection::SelectionListener;
use regex::Regex;
use url::Url;

pub const LISTE_PARAM: &str = "liste";

lazy_static::lazy_static! {
    static ref LISTE_SEPARATOR: Regex = Regex::new(r",|\+|\s").unwrap();
}

/// Identifiers read from a `liste` value, plus the tokens that were not numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedList {
    pub identifiers: Vec<usize>,
    pub rejected: Vec<String>,
}

/// Splits a `liste` value on `,`, `+` or whitespace. Empty tokens are skipped.
pub fn parse_liste(raw: &str) -> ParsedList {
    let mut parsed = ParsedList::default();
    for token in LISTE_SEPARATOR.split(raw).filter(|t| !t.is_empty()) {
        match token.parse::<usize>() {
            Ok(identifier) => parsed.identifiers.push(identifier),
            Err(_) => parsed.rejected.push(token.to_string()),
        }
    }
    parsed
}

pub fn serialize(identifiers: &[usize]) -> String {
    identifiers
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("+")
}

/// `liste` value of a full URL, form-decoded (`+` reads back as a space).
pub fn liste_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == LISTE_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Selection carried by a full location. Unparsable URLs carry none.
pub fn read_location(location: &str) -> ParsedList {
    Url::parse(location)
        .ok()
        .and_then(|url| liste_param(&url))
        .map(|raw| parse_liste(&raw))
        .unwrap_or_default()
}

/// Keeps the composer location in step with the selection.
///
/// Every write replaces the query with `?liste=<ids>` and records one history
/// entry. An empty selection resets the location to the bare page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSynchronizer {
    page: String,
    location: String,
    history: Vec<String>,
}

impl UrlSynchronizer {
    pub fn new(page_url: &str) -> Self {
        let page = strip_query(page_url);
        Self {
            location: page.clone(),
            page,
            history: Vec::new(),
        }
    }

    /// Starts from a deep link, keeping its `liste` parameter as the location.
    pub fn from_location(location: &str) -> Result<Self> {
        let url = Url::parse(location)?;
        let mut sync = Self::new(url.as_str());
        if let Some(raw) = liste_param(&url) {
            sync.location = format!("{}?{}={}", sync.page, LISTE_PARAM, raw.replace(' ', "+"));
        }
        Ok(sync)
    }

    /// Selection stored in the current location.
    pub fn read(&self) -> ParsedList {
        read_location(&self.location)
    }

    pub fn write(&mut self, identifiers: &[usize]) {
        self.location = if identifiers.is_empty() {
            self.page.clone()
        } else {
            format!("{}?{}={}", self.page, LISTE_PARAM, serialize(identifiers))
        };
        tracing::debug!(location = %self.location, "location updated");
        self.history.push(self.location.clone());
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl SelectionListener for UrlSynchronizer {
    fn selection_changed(&mut self, identifiers: &[usize]) {
        self.write(identifiers);
    }
}

fn strip_query(page_url: &str) -> String {
    match Url::parse(page_url) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => page_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
