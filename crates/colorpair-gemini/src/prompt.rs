//! Prompt construction for color pairing.

use colorpair_models::{GarmentType, SUGGESTION_COUNT};

/// Build the instruction sent alongside the garment image.
pub fn build_color_prompt(garment: &GarmentType) -> String {
    format!(
        r##"Analyze this image of a {garment} wear and suggest exactly {count} complementary colors.
Note that top wear is worn on the upper body and bottom wear is worn on the lower body. Suggest colors for the matching piece.
If the image is not a clothing image, respond with an error message text instead.
You must respond with a JSON array containing exactly {count} color suggestions.
Each suggestion must have these exact fields: "ColorName", "hexCode", "description"

Example format:
[
    {{
        "ColorName": "Navy Blue",
        "hexCode": "#000080",
        "description": "A deep, professional blue that pairs well with light colors"
    }},
    {{
        "ColorName": "Burgundy",
        "hexCode": "#800020",
        "description": "A rich red wine color that adds sophistication"
    }},
    {{
        "ColorName": "Forest Green",
        "hexCode": "#228B22",
        "description": "A natural green that creates an earthy combination"
    }},
    {{
        "ColorName": "Camel",
        "hexCode": "#C19A6B",
        "description": "A warm neutral that softens bold pieces"
    }},
    {{
        "ColorName": "Ivory",
        "hexCode": "#FFFFF0",
        "description": "A clean off-white that brightens darker tones"
    }}
]

Respond only with the JSON array, no additional text or explanation."##,
        garment = garment,
        count = SUGGESTION_COUNT,
    )
}
