//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[ortho_env(crate = "...")]` attribute value into
//! the tokens that prefix every `ortho_env::` path in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `ortho_env` when no override is present.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ortho_env }, |path| quote! { #path })
}

#[cfg(test)]
mod tests {
    //! Unit tests for crate path resolution with default and custom paths.

    use super::*;
    use anyhow::Result;
    use rstest::rstest;

    #[rstest]
    #[case::default(None, "ortho_env")]
    #[case::custom(Some("my_alias"), "my_alias")]
    #[case::nested(Some("deps::ortho_env"), "deps :: ortho_env")]
    fn resolve_produces_expected_tokens(
        #[case] input: Option<&str>,
        #[case] expected: &str,
    ) -> Result<()> {
        let parsed = input.map(syn::parse_str::<syn::Path>).transpose()?;
        let tokens = resolve(parsed.as_ref());
        anyhow::ensure!(tokens.to_string() == expected, "unexpected tokens {tokens}");
        Ok(())
    }
}
