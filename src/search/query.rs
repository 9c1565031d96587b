/// Words shorter than this (in characters) are dropped.
const MIN_WORD_CHARS: usize = 3;

const MAX_QUERY_WORDS: usize = 5;

const TRIM_CHARS: &[char] = &[
    '.', ',', ';', ':', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}', '«', '»', '—', '–', '-',
];

/// Russian function words that only add noise to image queries.
const RU_STOP_WORDS: &[&str] = &[
    "в", "на", "и", "из", "для", "что", "как", "это", "по", "от", "с", "о", "к", "не", "за", "у",
    "но", "же", "все", "так", "его", "её", "их", "мы", "вы", "он", "она", "они", "был", "была",
    "будет", "уже", "ещё", "еще", "или", "ни", "бы", "до", "под", "при", "без", "над", "через",
];

/// Builds a short image query from an article title: up to five meaningful words,
/// with `city` appended unless the title already mentions it.
pub fn build_image_query(title: &str, city: &str) -> String {
    let words: Vec<&str> = title
        .split_whitespace()
        .map(|w| w.trim_matches(TRIM_CHARS))
        .filter(|w| !w.is_empty())
        .filter(|w| !RU_STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .take(MAX_QUERY_WORDS)
        .collect();

    let mut query = words.join(" ");

    let city = city.trim();
    if !city.is_empty() && !query.to_lowercase().contains(&city.to_lowercase()) {
        if !query.is_empty() {
            query.push(' ');
        }
        query.push_str(city);
    }

    query
}
