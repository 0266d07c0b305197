use chrono::NaiveDate;

/// Instruction prompt sent alongside the image.
///
/// The date is the caller's local calendar date; the model compares it
/// with the purchase date printed on the receipt.
pub fn build_prompt(today: NaiveDate) -> String {
    let iso = today.format("%Y-%m-%d");
    let long = today.format("%A, %B %-d, %Y");
    format!(
        "Today's date is {iso} ({long}).\n\
         \n\
         Analyze the provided photo. It should show a shopping bag together with \
         the purchase receipt for it.\n\
         \n\
         1. Bag: decide whether the bag is made of a recyclable or reusable material \
         (paper, cardboard, cloth, jute, canvas) or is a plastic / non-recyclable bag. \
         If no bag is visible, answer \"not_detected\".\n\
         2. Receipt: decide whether a purchase receipt is visible in the photo.\n\
         3. Receipt date: the receipt is valid only if it is clearly legible, is not a \
         screenshot, and its printed purchase date is {iso}. Any other date, or no \
         readable date, makes it invalid.\n\
         \n\
         Respond ONLY with a single JSON object, no markdown and no commentary, in \
         exactly this shape:\n\
         {{\n\
         \x20 \"bagType\": \"recyclable\" | \"non_recyclable\" | \"not_detected\",\n\
         \x20 \"receiptDetected\": boolean,\n\
         \x20 \"receiptValid\": boolean,\n\
         \x20 \"confidenceScore\": number between 0 and 1,\n\
         \x20 \"explanation\": string\n\
         }}"
    )
}
