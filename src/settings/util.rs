use anyhow::{Result, bail};
use typeahead::source::FilterSet;

/// Parse `KEY=VALUE` filter arguments, trimming whitespace around both sides.
pub(super) fn parse_filters(values: &[String]) -> Result<FilterSet> {
    let mut filters = FilterSet::new();
    for value in values {
        let Some((key, wanted)) = value.split_once('=') else {
            bail!("filter `{value}` must look like KEY=VALUE");
        };
        let (key, wanted) = (key.trim(), wanted.trim());
        if key.is_empty() || wanted.is_empty() {
            bail!("filter `{value}` has an empty key or value");
        }
        filters.insert(key, wanted);
    }
    Ok(filters)
}
