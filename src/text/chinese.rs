use jieba_rs::Jieba;
use lazy_static::lazy_static;

lazy_static! {
    static ref SEGMENTER: Jieba = Jieba::new();
}

/// Insert explicit token boundaries into Chinese text
///
/// The vectorizer assumes whitespace-delimited tokens, so Chinese text is run
/// through jieba word segmentation and the segments re-joined with single
/// spaces. Pure text-to-text; the only state is the shared segmentation
/// dictionary.
pub fn segment(text: &str) -> String {
    SEGMENTER.cut(text, false).join(" ")
}

/// Segment a whole corpus
pub fn segment_all(texts: &[String]) -> Vec<String> {
    texts.iter().map(|text| segment(text)).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn splits_words_on_whitespace_boundaries() {
        assert_eq!(segment("我爱北京天安门"), "我 爱 北京 天安门");
    }

    #[test]
    fn segments_every_text_in_a_corpus() {
        let corpus = vec!["今天天气很好".to_string(), "我爱北京天安门".to_string()];

        let segmented = segment_all(&corpus);

        assert_eq!(segmented.len(), 2);
        for text in &segmented {
            assert!(text.contains(' '), "expected boundaries in {text:?}");
        }
    }
}
