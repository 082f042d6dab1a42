use cinetaste_core::collection::{BackfillReport, seed_snippet};
use cinetaste_model::{
    CatalogRecord, CollectionItem, CollectionState, Prediction, Rating, Recommendation,
};

pub fn item_line(item: &CollectionItem) -> String {
    format!(
        "{:>8}  {:<7} {:<6}  {}  [{}]",
        item.id(),
        item.record.category,
        item.record.kind.as_api_str(),
        item.title(),
        item.record.genre
    )
}

pub fn collection(state: &CollectionState, only: Option<Rating>) -> String {
    let mut out = String::new();
    for rating in Rating::ALL {
        if only.is_some_and(|r| r != rating) {
            continue;
        }
        let items = state.partition(rating);
        out.push_str(&format!("{} ({})\n", rating.label(), items.len()));
        for item in items {
            out.push_str("  ");
            out.push_str(&item_line(item));
            out.push('\n');
        }
    }

    if only.is_none() {
        let summary: Vec<String> = state
            .counts()
            .iter()
            .map(|(rating, count)| format!("{} {}", count, rating.key()))
            .collect();
        out.push_str(&format!("{} items: {}\n", state.len(), summary.join(", ")));
    }
    out
}

pub fn record(record: &CatalogRecord) -> String {
    let mut out = format!(
        "{} [{} / {}]\n  id: {}\n  genre: {}\n",
        record.title,
        record.category,
        record.kind.as_api_str(),
        record.id,
        record.genre
    );
    if let Some(synopsis) = &record.synopsis {
        out.push_str(&format!("  synopsis: {synopsis}\n"));
    }
    if let Some(poster) = &record.poster_url {
        out.push_str(&format!("  poster: {poster}\n"));
    }
    out
}

pub fn item_details(item: &CollectionItem) -> String {
    format!(
        "{}  rating: {}\n  seed: {}\n",
        record(&item.record),
        item.rating.label(),
        seed_snippet(item)
    )
}

pub fn recommendation(rec: &Recommendation) -> String {
    let p = &rec.probabilities;
    let mut out = format!(
        "{} [{} / {}]\n\n{}\n\nLoved {}%  Liked {}%  Meh {}%  Disliked {}%  (most likely: {})\n\n{}\n",
        rec.title,
        rec.category,
        rec.genre,
        rec.synopsis,
        p.loved,
        p.liked,
        p.meh,
        p.disliked,
        p.most_likely().label(),
        rec.analysis
    );
    if let Some(poster) = &rec.poster_url {
        out.push_str(&format!("\nposter: {poster}\n"));
    }
    out
}

pub fn prediction(title: &str, prediction: &Prediction) -> String {
    format!("{title}\n{}\n\n{}\n", prediction.prediction, prediction.reason)
}

pub fn backfill(report: &BackfillReport) -> String {
    format!("backfilled {} item(s), {} failed\n", report.updated, report.failed)
}

#[cfg(test)]
mod tests {
    use cinetaste_model::{CatalogId, Category, MediaKind};

    use super::*;

    #[test]
    fn filtered_listing_skips_other_ratings_and_summary() {
        let mut state = CollectionState::new();
        state.insert(CollectionItem::new(
            CatalogRecord {
                id: CatalogId(24),
                kind: MediaKind::Movie,
                title: "Kill Bill: Vol. 1 (2003)".into(),
                category: Category::Movie,
                genre: "Action".into(),
                synopsis: None,
                poster_url: None,
            },
            Rating::Meh,
            1,
        ));

        let all = collection(&state, None);
        assert!(all.contains("Loved (0)"));
        assert!(all.contains("1 items: 0 loved, 0 liked, 1 meh, 0 disliked"));

        let meh = collection(&state, Some(Rating::Meh));
        assert!(!meh.contains("Loved"));
        assert!(meh.contains("Kill Bill: Vol. 1 (2003)"));
    }
}
