use quiz_core::model::{Difficulty, EmbedLink};
use services::flashcard::{ActiveCard, CardState};

/// One selectable option row, rendered as "B: 4".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRowVm {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

/// Front of the flip card: prompt plus options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardFrontVm {
    pub prompt: String,
    pub options: Vec<OptionRowVm>,
    /// Confirm is disabled until something is selected.
    pub can_confirm: bool,
}

/// Back of the flip card: correctness, explanation and extras.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardBackVm {
    pub verdict: &'static str,
    pub difficulty_label: String,
    /// Badge class bucket; "neutral" for unknown labels.
    pub difficulty_badge: &'static str,
    pub explanation: String,
    pub topics: Vec<String>,
    pub embed_link: Option<String>,
}

/// Map the active card's front. Valid in any state; past `Selecting` the
/// rows keep showing the locked selection.
#[must_use]
pub fn map_card_front(card: &ActiveCard) -> CardFrontVm {
    let question = card.question();
    let options = question
        .options
        .iter()
        .map(|(key, text)| OptionRowVm {
            key: key.as_str().to_owned(),
            label: format!("{key}: {text}"),
            selected: card.selected() == Some(key),
        })
        .collect();

    CardFrontVm {
        prompt: question.prompt.clone(),
        options,
        can_confirm: card.can_confirm(),
    }
}

/// Map the back of the card; `None` until the card is revealed.
#[must_use]
pub fn map_card_back(card: &ActiveCard, embed: Option<&EmbedLink>) -> Option<CardBackVm> {
    if !matches!(card.state(), CardState::Revealed | CardState::Advancing) {
        return None;
    }
    let question = card.question();
    let verdict = if card.is_correct().unwrap_or(false) {
        "Correct!"
    } else {
        "Incorrect"
    };

    Some(CardBackVm {
        verdict,
        difficulty_label: question.difficulty.as_str().to_owned(),
        difficulty_badge: difficulty_badge(question.difficulty.bucket()),
        explanation: question
            .explanation
            .clone()
            .unwrap_or_else(|| "No explanation provided.".to_owned()),
        topics: question.related_topics.clone(),
        embed_link: embed.map(|link| link.as_str().to_owned()),
    })
}

/// Badge class for a difficulty bucket.
#[must_use]
pub fn difficulty_badge(bucket: Option<Difficulty>) -> &'static str {
    match bucket {
        Some(Difficulty::Easy) => "easy",
        Some(Difficulty::Medium) => "medium",
        Some(Difficulty::Hard) => "hard",
        None => "neutral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{DifficultyLabel, OptionKey, QuestionDraft, QuestionId};
    use quiz_core::time::fixed_now;
    use std::collections::BTreeMap;

    fn build_card() -> ActiveCard {
        let question = QuestionDraft {
            id: QuestionId::new(1),
            question: "2+2?".into(),
            options: BTreeMap::from([
                (OptionKey::new("A"), "3".into()),
                (OptionKey::new("B"), "4".into()),
            ]),
            correct_answer: OptionKey::new("B"),
            explanation: None,
            difficulty: DifficultyLabel::new("Expert"),
            related_topics: vec!["Math".into()],
        }
        .validate()
        .unwrap();
        ActiveCard::activate(question, fixed_now())
    }

    #[test]
    fn front_rows_mark_the_selection() {
        let mut card = build_card();
        card.select(OptionKey::new("B")).unwrap();

        let front = map_card_front(&card);
        assert_eq!(front.prompt, "2+2?");
        assert_eq!(front.options.len(), 2);
        assert_eq!(front.options[0].label, "A: 3");
        assert!(!front.options[0].selected);
        assert!(front.options[1].selected);
        assert!(front.can_confirm);
    }

    #[test]
    fn confirm_stays_disabled_without_selection() {
        let front = map_card_front(&build_card());
        assert!(!front.can_confirm);
    }

    #[test]
    fn back_is_hidden_until_revealed() {
        let mut card = build_card();
        assert!(map_card_back(&card, None).is_none());

        card.select(OptionKey::new("A")).unwrap();
        card.confirm().unwrap();
        assert!(map_card_back(&card, None).is_none());

        card.reveal().unwrap();
        let back = map_card_back(&card, None).unwrap();
        assert_eq!(back.verdict, "Incorrect");
        assert_eq!(back.difficulty_badge, "neutral");
        assert_eq!(back.explanation, "No explanation provided.");
        assert_eq!(back.topics, vec!["Math".to_owned()]);
        assert!(back.embed_link.is_none());
    }

    #[test]
    fn back_carries_the_embed_link_when_present() {
        let mut card = build_card();
        card.select(OptionKey::new("B")).unwrap();
        card.confirm().unwrap();
        card.reveal().unwrap();

        let link = EmbedLink::parse("https://www.youtube.com/embed/abc123").unwrap();
        let back = map_card_back(&card, Some(&link)).unwrap();
        assert_eq!(back.verdict, "Correct!");
        assert_eq!(
            back.embed_link.as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
    }

    #[test]
    fn badge_buckets_cover_known_labels() {
        assert_eq!(difficulty_badge(Some(Difficulty::Easy)), "easy");
        assert_eq!(difficulty_badge(Some(Difficulty::Medium)), "medium");
        assert_eq!(difficulty_badge(Some(Difficulty::Hard)), "hard");
        assert_eq!(difficulty_badge(None), "neutral");
    }
}
