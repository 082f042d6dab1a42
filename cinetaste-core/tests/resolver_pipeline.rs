#[path = "support/mod.rs"]
mod support;

use std::sync::Arc;

use cinetaste_core::ResolveError;
use cinetaste_core::TitleResolver;
use cinetaste_core::generation::GenerationPurpose;
use cinetaste_model::{CatalogId, Category, MediaKind, genre_ids};
use support::{FakeCatalog, ScriptedBackend, candidate, details};

fn resolver(catalog: &Arc<FakeCatalog>, backend: &Arc<ScriptedBackend>) -> TitleResolver {
    TitleResolver::new(catalog.clone(), backend.clone())
}

#[tokio::test]
async fn falls_back_to_english_and_narrows_by_year() {
    let catalog = Arc::new(
        FakeCatalog::new()
            .with_search(
                "Interstellar",
                "en-US",
                vec![
                    candidate(157336, MediaKind::Movie, "Interstellar", 120.0, Some("2014-11-05")),
                    candidate(301959, MediaKind::Movie, "Interstellar: Nolan's Odyssey", 4.0, Some("2014-11-05")),
                    candidate(999001, MediaKind::Movie, "Interstellar Wars", 2.0, Some("2016-01-01")),
                ],
            )
            .with_details(details(
                157336,
                MediaKind::Movie,
                "Interstellar",
                Some("2014-11-05"),
                &[(12, "Adventure"), (18, "Drama")],
                "en",
            )),
    );
    let backend = Arc::new(ScriptedBackend::answering(&["157336"]));

    let record = resolver(&catalog, &backend)
        .resolve("Interstellar (2014)")
        .await
        .expect("resolves");

    assert_eq!(record.id, CatalogId(157336));
    assert_eq!(record.title, "Interstellar (2014)");
    assert_eq!(record.category, Category::Movie);
    assert_eq!(record.genre, "Adventure");
    assert_eq!(
        record.poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/poster-157336.jpg")
    );

    assert_eq!(
        catalog.search_calls(),
        vec!["search Interstellar [pt-BR]", "search Interstellar [en-US]"]
    );

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].purpose, GenerationPurpose::Disambiguation);
    assert!(requests[0].web_search);
    assert!(requests[0].prompt.contains("301959"));
    assert!(
        !requests[0].prompt.contains("999001"),
        "the year filter should have dropped the 2016 candidate"
    );
}

#[tokio::test]
async fn invalid_judgment_picks_the_most_popular_candidate() {
    let catalog = Arc::new(
        FakeCatalog::new()
            .with_search(
                "Dune",
                "pt-BR",
                vec![
                    candidate(841, MediaKind::Movie, "Duna", 30.0, Some("1984-12-14")),
                    candidate(438631, MediaKind::Movie, "Duna", 250.0, Some("2021-09-15")),
                ],
            )
            .with_details(details(
                438631,
                MediaKind::Movie,
                "Duna",
                Some("2021-09-15"),
                &[(878, "Ficção científica")],
                "en",
            )),
    );
    let backend = Arc::new(ScriptedBackend::answering(&["I am not sure, maybe 12345"]));

    let record = resolver(&catalog, &backend)
        .resolve("Dune")
        .await
        .expect("resolves");

    assert_eq!(record.id, CatalogId(438631));
    assert_eq!(record.title, "Duna (2021)");
}

#[tokio::test]
async fn judgment_naming_an_unlisted_id_picks_the_most_popular_candidate() {
    let catalog = Arc::new(
        FakeCatalog::new()
            .with_search(
                "Oldboy",
                "pt-BR",
                vec![
                    candidate(670, MediaKind::Movie, "Oldboy", 60.0, Some("2003-11-21")),
                    candidate(87516, MediaKind::Movie, "Oldboy", 20.0, Some("2013-11-27")),
                ],
            )
            .with_details(details(
                670,
                MediaKind::Movie,
                "Oldboy",
                Some("2003-11-21"),
                &[(18, "Drama")],
                "ko",
            )),
    );
    let backend = Arc::new(ScriptedBackend::answering(&["999"]));

    let record = resolver(&catalog, &backend)
        .resolve("Oldboy")
        .await
        .expect("resolves");

    assert_eq!(backend.requests().len(), 1);
    assert_eq!(record.id, CatalogId(670));
    assert_eq!(catalog.calls().last().map(String::as_str), Some("details 670 movie"));
}

#[tokio::test]
async fn unavailable_backend_still_resolves_by_popularity() {
    let catalog = Arc::new(
        FakeCatalog::new()
            .with_search(
                "Solaris",
                "pt-BR",
                vec![
                    candidate(593, MediaKind::Movie, "Solaris", 15.0, Some("1972-03-20")),
                    candidate(2103, MediaKind::Movie, "Solaris", 15.0, Some("2002-11-27")),
                ],
            )
            .with_details(details(593, MediaKind::Movie, "Solaris", Some("1972-03-20"), &[], "ru")),
    );
    let backend = Arc::new(ScriptedBackend::new());

    let record = resolver(&catalog, &backend)
        .resolve("Solaris")
        .await
        .expect("resolves");

    assert_eq!(record.id, CatalogId(593), "ties go to the first candidate");
    assert_eq!(record.genre, "Unknown");
}

#[tokio::test]
async fn single_candidate_skips_the_backend() {
    let catalog = Arc::new(
        FakeCatalog::new()
            .with_search(
                "Frieren",
                "pt-BR",
                vec![candidate(209867, MediaKind::Series, "Frieren", 80.0, Some("2023-09-29"))],
            )
            .with_details(details(
                209867,
                MediaKind::Series,
                "Frieren e a Jornada para o Além",
                Some("2023-09-29"),
                &[(genre_ids::ANIMATION, "Animação")],
                "ja",
            )),
    );
    let backend = Arc::new(ScriptedBackend::answering(&["1"]));

    let record = resolver(&catalog, &backend)
        .resolve("Frieren")
        .await
        .expect("resolves");

    assert_eq!(record.category, Category::Anime);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn talk_show_genre_overrides_anime() {
    let catalog = Arc::new(
        FakeCatalog::new()
            .with_search(
                "Gaki no Tsukai anime",
                "pt-BR",
                vec![candidate(1, MediaKind::Series, "Gaki no Tsukai", 5.0, Some("1989-10-03"))],
            )
            .with_details(details(
                1,
                MediaKind::Series,
                "Gaki no Tsukai",
                Some("1989-10-03"),
                &[(genre_ids::TALK, "Talk"), (genre_ids::ANIMATION, "Animation")],
                "ja",
            )),
    );
    let backend = Arc::new(ScriptedBackend::new());

    let record = resolver(&catalog, &backend)
        .resolve("Gaki no Tsukai anime")
        .await
        .expect("resolves");

    assert_eq!(record.category, Category::Show);
    assert_eq!(record.genre, "Talk");
}

#[tokio::test]
async fn parenthesised_qualifiers_are_dropped_as_a_last_resort() {
    let catalog = Arc::new(
        FakeCatalog::new()
            .with_search(
                "The Office",
                "pt-BR",
                vec![candidate(2316, MediaKind::Series, "The Office", 90.0, Some("2005-03-24"))],
            )
            .with_details(details(
                2316,
                MediaKind::Series,
                "The Office",
                Some("2005-03-24"),
                &[(35, "Comédia")],
                "en",
            )),
    );
    let backend = Arc::new(ScriptedBackend::new());

    let record = resolver(&catalog, &backend)
        .resolve("The Office (US)")
        .await
        .expect("resolves");

    assert_eq!(record.id, CatalogId(2316));
    assert_eq!(
        catalog.search_calls(),
        vec![
            "search The Office (US) [pt-BR]",
            "search The Office (US) [en-US]",
            "search The Office [pt-BR]",
        ]
    );
}

#[tokio::test]
async fn no_hits_anywhere_is_no_results() {
    let catalog = Arc::new(FakeCatalog::new());
    let backend = Arc::new(ScriptedBackend::new());

    let err = resolver(&catalog, &backend)
        .resolve("Nonexistent Film 1999")
        .await
        .expect_err("nothing matches");

    match err {
        ResolveError::NoResults { query } => assert_eq!(query, "Nonexistent Film 1999"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        catalog.search_calls(),
        vec![
            "search Nonexistent Film [pt-BR]",
            "search Nonexistent Film [en-US]",
            "search Nonexistent Film 1999 [pt-BR]",
            "search Nonexistent Film 1999 [en-US]",
        ]
    );
}

#[tokio::test]
async fn blank_query_is_rejected_without_searching() {
    let catalog = Arc::new(FakeCatalog::new());
    let backend = Arc::new(ScriptedBackend::new());

    let err = resolver(&catalog, &backend)
        .resolve("   ")
        .await
        .expect_err("blank");

    assert!(matches!(err, ResolveError::EmptyQuery));
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn provider_errors_propagate() {
    let catalog = Arc::new(FakeCatalog::new().with_failing_search("Heat"));
    let backend = Arc::new(ScriptedBackend::new());

    let err = resolver(&catalog, &backend)
        .resolve("Heat")
        .await
        .expect_err("search fails");

    assert!(matches!(err, ResolveError::Provider(_)));
}

#[tokio::test]
async fn best_match_prefers_the_primary_language() {
    let catalog = Arc::new(
        FakeCatalog::new()
            .with_search(
                "A Viagem de Chihiro (2001)",
                "pt-BR",
                vec![],
            )
            .with_search(
                "A Viagem de Chihiro",
                "pt-BR",
                vec![
                    candidate(129, MediaKind::Movie, "A Viagem de Chihiro", 95.0, Some("2001-07-20")),
                    candidate(5, MediaKind::Movie, "Chihiro Making Of", 1.0, None),
                ],
            ),
    );
    let backend = Arc::new(ScriptedBackend::new());

    let hit = resolver(&catalog, &backend)
        .best_match_by_title("A Viagem de Chihiro (2001)")
        .await
        .expect("searches")
        .expect("a hit");

    assert_eq!(hit.id, CatalogId(129));
    assert_eq!(
        catalog.search_calls(),
        vec![
            "search A Viagem de Chihiro (2001) [pt-BR]",
            "search A Viagem de Chihiro [pt-BR]",
        ]
    );
}
