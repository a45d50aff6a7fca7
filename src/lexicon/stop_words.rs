//! English stop words removed from dictionary definitions before they are
//! mined for storyline candidates.

use std::collections::HashSet;
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // articles & determiners
        "a", "an", "the", "this", "that", "these", "those", "each", "every", "either",
        "neither", "some", "any", "all", "both", "few", "many", "much", "several", "such",
        "another", "other", "others", "own", "same",
        // be / have / do
        "is", "are", "was", "were", "be", "been", "being", "am", "have", "has", "had",
        "having", "do", "does", "did", "doing", "done",
        // modals
        "will", "would", "shall", "should", "may", "might", "can", "could", "must", "cannot",
        // prepositions
        "to", "of", "in", "for", "on", "with", "at", "by", "from", "into", "about", "above",
        "below", "over", "under", "between", "through", "during", "before", "after",
        "against", "among", "amongst", "across", "along", "around", "behind", "beside",
        "besides", "beyond", "down", "up", "off", "onto", "out", "toward", "towards", "upon",
        "within", "without", "via", "per",
        // conjunctions & negation
        "and", "or", "but", "nor", "not", "no", "if", "then", "than", "so", "as", "because",
        "while", "although", "though", "whether", "unless", "until", "till", "yet", "else",
        "otherwise", "however", "therefore", "thus", "hence",
        // pronouns
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my",
        "your", "his", "our", "their", "its", "mine", "yours", "hers", "ours", "theirs",
        "myself", "yourself", "himself", "herself", "itself", "ourselves", "themselves",
        "one", "someone", "something", "anyone", "anything", "everyone", "everything",
        "nothing", "none",
        // interrogatives & relatives
        "who", "whom", "whose", "what", "which", "when", "where", "why", "how", "whatever",
        "whenever", "wherever", "whereas",
        // adverbs
        "very", "also", "just", "too", "more", "most", "less", "least", "only", "even",
        "ever", "never", "always", "often", "again", "already", "still", "here", "there",
        "now", "once", "rather", "quite", "almost", "perhaps", "well", "especially",
        "usually", "etc",
    ]
    .into_iter()
    .collect()
});

/// The shared stop-word set.
pub fn stop_words() -> &'static HashSet<&'static str> {
    &STOP_WORDS
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}
