use serde::{Deserialize, Serialize};

use stocktrail_core::{ProductId, VariantId};

/// Base string used when neither a variant SKU nor a product code is usable.
pub const FALLBACK_LABEL_BASE: &str = "ITEM";

/// Catalog product as seen by check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    /// Short product code printed on labels (e.g. "AC-SPLIT-12K").
    pub code: String,
    /// Whether the product is sold in variants; if so, check-in must be given one.
    pub has_variants: bool,
}

/// Catalog variant as seen by check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRef {
    pub id: VariantId,
    pub sku: String,
}

/// Base segment for primary-code generation.
///
/// Precedence: variant SKU, then product code, then the fallback constant.
/// Blank strings are skipped so a sloppy catalog entry cannot produce labels
/// like `"-K7Q2F1-ABC"`.
pub fn label_base<'a>(product: &'a ProductRef, variant: Option<&'a VariantRef>) -> &'a str {
    if let Some(v) = variant {
        let sku = v.sku.trim();
        if !sku.is_empty() {
            return sku;
        }
    }
    let code = product.code.trim();
    if !code.is_empty() {
        return code;
    }
    FALLBACK_LABEL_BASE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(code: &str, has_variants: bool) -> ProductRef {
        ProductRef {
            id: ProductId::new(),
            code: code.to_string(),
            has_variants,
        }
    }

    fn variant(sku: &str) -> VariantRef {
        VariantRef {
            id: VariantId::new(),
            sku: sku.to_string(),
        }
    }

    #[test]
    fn variant_sku_wins_over_product_code() {
        let p = product("PROD1", true);
        let v = variant("SKU-RED");
        assert_eq!(label_base(&p, Some(&v)), "SKU-RED");
    }

    #[test]
    fn product_code_used_without_variant() {
        let p = product("PROD1", false);
        assert_eq!(label_base(&p, None), "PROD1");
    }

    #[test]
    fn blank_entries_fall_through_to_the_constant() {
        let p = product("  ", false);
        let v = variant("");
        assert_eq!(label_base(&p, Some(&v)), FALLBACK_LABEL_BASE);
    }
}
