//! Prompt profiles, one per document category.
//!
//! Both profiles share [`OUTPUT_SCHEMA`]; only the reading instructions and
//! the per-field guidance differ.

use super::DocumentKind;

/// JSON shape every profile asks the model to return
pub const OUTPUT_SCHEMA: &str = r#"OUTPUT FORMAT - Return ONLY this JSON object (no markdown, no code blocks, no commentary):
{
  "short": "<string>",
  "medium": "<string>",
  "long": "<string>",
  "keyPoints": ["<string>", "... at least 3 entries"],
  "improvements": ["<string>", "... at least 3 entries"]
}"#;

/// Instructions and field guidance for one document category
#[derive(Debug)]
pub struct PromptProfile {
    pub kind: DocumentKind,
    pub prompt_text: &'static str,
    pub field_guidance: &'static str,
    pub output_schema: &'static str,
}

impl PromptProfile {
    /// Full prompt text sent alongside the document
    pub fn render(&self) -> String {
        format!(
            "{}\n\n{}\n\nFIELD GUIDANCE:\n{}\n\n{}",
            self.prompt_text, self.output_schema, self.field_guidance, ACCURACY_FOOTER
        )
    }
}

const ACCURACY_FOOTER: &str = "ACCURACY REQUIREMENTS:
- Copy names, numbers, dates, codes and IDs character-by-character; never round or normalise them
- Identify the document type (certificate, resume, report, invoice, contract, ID card, form, ...) and tailor the analysis to it
- Cross-check related values for consistency and report discrepancies found in the document itself
- If text is unclear or illegible, say so instead of guessing";

const PDF_PROMPT: &str = "You are an expert PDF document analyst with OCR capabilities. This PDF may span multiple pages of text, tables, images and structured content.

READING INSTRUCTIONS:
1. Read EVERY page; content frequently continues across page breaks
2. Extract all visible text: headers, body text, tables, captions and footnotes
3. Pay special attention to proper nouns, titles, figures, percentages, financial amounts, section headings, contact details, addresses and identification numbers
4. Keep the logical flow and section structure of the document";

const PDF_GUIDANCE: &str = "- short: 2-3 sentences giving the document type, main subject or person, and primary purpose
- medium: 5-7 sentences expanding on key details, dates, important figures and context
- long: 2-3 detailed paragraphs covering every section with exact names, dates, numbers and addresses, plus notable features or concerns
- keyPoints: exact names and titles, relevant dates, amounts with context, identifiers, critical terms, issuing parties, validity periods or deadlines
- improvements: quality observations, missing or unclear sections, organisation and clarity suggestions, verification recommendations, formatting improvements";

const IMAGE_PROMPT: &str = "You are an expert OCR specialist and document analyst. Extract and analyze all text in this image with maximum accuracy.

READING INSTRUCTIONS:
1. Perform thorough OCR on EVERY visible piece of text, top to bottom and left to right
2. Cover all regions: headers, body, footers, margins, watermarks, stamps and seals
3. Include printed text, handwriting, tables, forms, signatures and dates
4. Preserve spelling, capitalisation, punctuation and the exact date format shown";

const IMAGE_GUIDANCE: &str = "- short: 2-3 sentences on what the document is, who it concerns, and its purpose
- medium: 5-7 sentences with the document type, key names, dates and numbers, issuing authority, purpose and validity
- long: 2-3 paragraphs with a complete extraction of names, dates, identification numbers, addresses, amounts, terms and authorizations
- keyPoints: full names as written, all dates, identification or reference numbers, issuing organisation, monetary values, locations, validity terms
- improvements: image quality (clarity, resolution, contrast), legibility, missing or unclear information, capture suggestions, authentication observations";

static PDF_PROFILE: PromptProfile = PromptProfile {
    kind: DocumentKind::Pdf,
    prompt_text: PDF_PROMPT,
    field_guidance: PDF_GUIDANCE,
    output_schema: OUTPUT_SCHEMA,
};

static IMAGE_PROFILE: PromptProfile = PromptProfile {
    kind: DocumentKind::Image,
    prompt_text: IMAGE_PROMPT,
    field_guidance: IMAGE_GUIDANCE,
    output_schema: OUTPUT_SCHEMA,
};

/// Profile for a document category
pub fn profile_for(kind: DocumentKind) -> &'static PromptProfile {
    match kind {
        DocumentKind::Pdf => &PDF_PROFILE,
        DocumentKind::Image => &IMAGE_PROFILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_kind() {
        assert_eq!(profile_for(DocumentKind::Pdf).kind, DocumentKind::Pdf);
        assert_eq!(profile_for(DocumentKind::Image).kind, DocumentKind::Image);
    }

    #[test]
    fn test_profiles_share_output_schema() {
        let pdf = profile_for(DocumentKind::Pdf).render();
        let image = profile_for(DocumentKind::Image).render();

        assert!(pdf.contains(OUTPUT_SCHEMA));
        assert!(image.contains(OUTPUT_SCHEMA));
        for field in ["short", "medium", "long", "keyPoints", "improvements"] {
            assert!(OUTPUT_SCHEMA.contains(field), "schema missing {}", field);
        }
    }

    #[test]
    fn test_profiles_differ_in_emphasis() {
        let pdf = profile_for(DocumentKind::Pdf).render();
        let image = profile_for(DocumentKind::Image).render();

        assert!(pdf.contains("EVERY page"));
        assert!(!image.contains("EVERY page"));
        assert!(image.contains("Handwriting") || image.contains("handwriting"));
        assert!(image.contains("stamps"));
    }
}
