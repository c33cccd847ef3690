//! Per-asset provider attribution.

use crate::asset::{AssetRecord, MatchResult};
use crate::registry::ProviderRuleSet;

/// Find the first provider whose rules match any text field of `asset`.
///
/// Providers are tried in registry order and each provider's rules in rule
/// order; every rule is tested against filename, title, alt text and
/// description. The first hit wins, so an earlier provider always takes
/// precedence over a later one that would also match.
pub fn match_asset<'r>(asset: &AssetRecord, rules: &'r ProviderRuleSet) -> Option<&'r str> {
    let fields = asset.text_fields();

    rules
        .iter()
        .find(|provider| {
            provider
                .rules()
                .iter()
                .any(|rule| fields.iter().any(|field| rule.is_match(field)))
        })
        .map(|provider| provider.name())
}

/// Attribute `asset` and wrap it as a [`MatchResult`].
pub fn attribute(asset: AssetRecord, rules: &ProviderRuleSet) -> MatchResult {
    let source = match_asset(&asset, rules).map(str::to_string);
    MatchResult::new(asset, source)
}
