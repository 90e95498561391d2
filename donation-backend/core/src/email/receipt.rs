use snafu::ResultExt;
use tera::Tera;

use super::EmailContext;
use crate::error::{self, Result};

const TEMPLATE_NAME: &str = "receipt.html";

const RECEIPT_TEMPLATE: &str = include_str!("receipt.html");

/// Renders the donor receipt.
///
/// Every value is HTML-escaped, braces included, so text supplied by a donor
/// can never open a placeholder of its own.
#[derive(Clone, Debug)]
pub struct ReceiptRenderer {
    engine: Tera,
}

impl ReceiptRenderer {
    /// Loads the built-in receipt template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be parsed.
    pub fn new() -> Result<Self> { Self::with_template(RECEIPT_TEMPLATE) }

    /// # Errors
    ///
    /// Returns an error if `template` cannot be parsed, e.g. it holds an
    /// unterminated placeholder.
    pub fn with_template(template: &str) -> Result<Self> {
        let mut engine = Tera::default();
        engine.set_escape_fn(escape_html);
        engine.add_raw_template(TEMPLATE_NAME, template).context(error::ParseTemplateSnafu)?;

        Ok(Self { engine })
    }

    /// # Errors
    ///
    /// Returns an error if the template refers to a placeholder without a
    /// value. No partial document is returned.
    pub fn render(&self, context: &EmailContext<'_>) -> Result<String> {
        self.engine
            .render(TEMPLATE_NAME, &template_context(context))
            .context(error::RenderTemplateSnafu)
    }
}

fn template_context(context: &EmailContext<'_>) -> tera::Context {
    let organization = context.organization;
    let donation = context.donation;

    let mut values = tera::Context::new();
    values.insert("ORG_NAME", &organization.name);
    values.insert("ORG_ADDRESS", &organization.address);
    values.insert("ORG_CITY", &organization.city);
    values.insert("ORG_STATE", &organization.state);
    values.insert("ORG_ZIP", &organization.zip);
    values.insert("ORG_PHONE", &organization.phone);
    values.insert("TAX_ID", &organization.tax_id);
    values.insert("RECEIPT_DATE", &context.receipt_date);
    values.insert("SEASON", &context.season);
    values.insert("DONOR_NAME", &donation.name);
    values.insert("DONOR_ADDRESS_LINE1", &donation.address_line1);
    values.insert("DONOR_ADDRESS_LINE2", &donation.address_line2);
    values.insert("DONOR_CITY", &donation.city);
    values.insert("DONOR_STATE", &donation.state);
    values.insert("DONOR_ZIP", &donation.postal_code);
    values.insert("AMOUNT", &context.amount());
    values.insert("TEAM_NAME", context.team.display_name());
    values.insert("PROGRAM_SUFFIX", context.team.program_suffix());
    values
}

fn escape_html(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            '{' => output.push_str("&#123;"),
            '}' => output.push_str("&#125;"),
            c => output.push(c),
        }
    }
    output
}
