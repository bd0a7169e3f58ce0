pub const CHAT_SYSTEM: &str = include_str!("../data/prompts/chat_system.txt");
pub const ENHANCE: &str = include_str!("../data/prompts/enhance.txt");
pub const BLUR_FACES: &str = include_str!("../data/prompts/blur_faces.txt");
pub const REPLACE_BACKGROUND: &str = include_str!("../data/prompts/replace_background.txt");
pub const FACE_SWAP: &str = include_str!("../data/prompts/face_swap.txt");
pub const CONSISTENT_CHARACTER: &str = include_str!("../data/prompts/consistent_character.txt");
pub const STYLE_TRANSFER: &str = include_str!("../data/prompts/style_transfer.txt");
pub const MERGE_DEFAULT: &str = include_str!("../data/prompts/merge_default.txt");
pub const MONTAGE: &str = include_str!("../data/prompts/montage.txt");
pub const LOGO: &str = include_str!("../data/prompts/logo.txt");
pub const BRAND_IDENTITY: &str = include_str!("../data/prompts/brand_identity.txt");
pub const THUMBNAIL: &str = include_str!("../data/prompts/thumbnail.txt");
pub const AD_POST: &str = include_str!("../data/prompts/ad_post.txt");

pub const THUMBNAIL_WITH_SUBJECT: &str =
    "Include the person/subject from the provided image prominently on one side.";
pub const THUMBNAIL_WITH_BACKGROUND: &str =
    "Use the provided image as the background environment.";
pub const THUMBNAIL_GENERATED_BACKGROUND: &str =
    "Create a relevant, exciting background based on the title context.";
pub const AD_WITH_PRODUCT_IMAGE: &str = "Use the provided product image as the central hero element of the design. Integrate it seamlessly into the background/layout.";
pub const AD_GENERATED_PRODUCT: &str = "Generate a realistic and attractive visualization of the product or service based on the description.";

/// Replace `{{key}}` placeholders in a template string.
///
/// Single pass over the template: substituted values are copied through as-is
/// and never scanned for placeholders. Unknown keys are left in place.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut rest = template.trim();
    let mut result = String::with_capacity(rest.len());

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };

        let key = &after_open[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}
