//! Prompt construction for brand name and slogan generation

use crate::types::GenerationParams;

/// Prompt used to check that a provider answers at all
pub const HEALTH_CHECK_PROMPT: &str = "Reply with the single word OK.";

/// Build the instruction sent to the model.
///
/// Parameters are embedded verbatim; blank values are rejected by the caller.
pub fn build_prompt(params: &GenerationParams) -> String {
    let count = params.operation().item_count();

    match params {
        GenerationParams::BrandNames { sector, style } => format!(
            "Generate {} creative, memorable brand names for the {} sector with a {} style.

Guidelines:
- Short names (1 to 3 words)
- Easy to pronounce
- Fitting for the {} sector and the {} style

Return ONLY the list of names, one per line, without numbering, bullets or any other formatting.",
            count, sector, style, sector, style
        ),
        GenerationParams::Slogans { brand_name, sector } => format!(
            "Generate {} catchy slogans for the brand \"{}\" in the {} sector.

Return ONLY the list of slogans, one per line, without numbering, bullets or quotes.",
            count, brand_name, sector
        ),
    }
}
