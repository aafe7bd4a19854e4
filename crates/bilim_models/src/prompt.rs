use bilim_core::{CONNECTIVE, Topic};

/// Builds the single user prompt sent for one fact about `topic`.
///
/// The reply is expected in three lines: the statement, the explanation
/// starting with [`CONNECTIVE`], and a `[keywords: ...]` annotation used for
/// the photo search.
///
/// # Examples
///
/// ```
/// use bilim_core::Topic;
/// use bilim_models::fact_prompt;
///
/// let prompt = fact_prompt(Topic::Ocean);
/// assert!(prompt.contains("Ocean"));
/// assert!(prompt.contains("[keywords:"));
/// ```
pub fn fact_prompt(topic: Topic) -> String {
    format!(
        r#"Generate one fascinating, well-documented scientific fact about {topic} in Uzbek, with a clear explanation. Pick a phenomenon that is easy to show in a photograph.

RULES:
1. First line: the fact itself (at most 50 characters)
2. Second line: the explanation, starting with "{connective}" (at most 80 characters)
3. Use simple but precise Uzbek
4. Only facts with clear scientific evidence, nothing questionable or misleading
5. The explanation must contain specific details, not a truism
6. If the fact needs a long explanation, choose a different fact

GOOD EXAMPLES:
Kolibri yuragining urishi minutiga 1200 marta
{connective} juda tez harakat qilish uchun yuqori energiya talab qilinadi
[keywords: hummingbird, heart, speed]

Ayiq bir kunda 40 kg gacha asalni yeya oladi
{connective} uning oshqozoni katta hajmda oziq-ovqatni hazm qila oladi
[keywords: bear, honey, eating]

FORMAT:
[Scientific fact]
[Explanation]

[keywords: main_subject, action, detail, visual_element]"#,
        topic = topic,
        connective = CONNECTIVE,
    )
}
