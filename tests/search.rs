use crux_core::testing::AppTester;
use movie_core::{App, Effect, Event, Model, Movie, PageResponse};
use proptest::prelude::*;

fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.into(),
        overview: String::new(),
        poster_path: None,
        release_date: None,
        vote_average: 6.0,
    }
}

fn loaded_model(app: &AppTester<App, Effect>, titles: &[&str]) -> Model {
    let mut model = Model::default();
    model.online = true;
    app.update(Event::LoadInitial, &mut model);
    let results: Vec<Movie> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| movie(i as u64 + 1, title))
        .collect();
    app.update(
        Event::TrendingPageLoaded {
            generation: model.fetch_generation,
            page: 1,
            result: Box::new(Ok(PageResponse {
                page: 1,
                total_results: results.len() as u64,
                results,
                total_pages: 1,
            })),
        },
        &mut model,
    );
    model
}

#[test]
fn query_narrows_the_visible_list() {
    let app = AppTester::<App, _>::default();
    let mut model = loaded_model(
        &app,
        &["The Avengers", "Avengers: Endgame", "Batman Begins"],
    );

    app.update(
        Event::QueryChanged {
            query: "avengers".into(),
        },
        &mut model,
    );

    let view = app.view(&model);
    let titles: Vec<&str> = view.movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["The Avengers", "Avengers: Endgame"]);
    assert!(view.has_search_results);
}

#[test]
fn no_match_reports_empty_results() {
    let app = AppTester::<App, _>::default();
    let mut model = loaded_model(&app, &["The Avengers", "Batman Begins"]);

    app.update(
        Event::QueryChanged {
            query: "Superman".into(),
        },
        &mut model,
    );

    let view = app.view(&model);
    assert!(view.movies.is_empty());
    assert!(!view.has_search_results);
    // The full list is still intact behind the filter.
    assert_eq!(model.movies.len(), 2);
}

#[test]
fn clearing_the_query_restores_the_full_list() {
    let app = AppTester::<App, _>::default();
    let mut model = loaded_model(&app, &["The Avengers", "Batman Begins"]);

    app.update(
        Event::QueryChanged {
            query: "Superman".into(),
        },
        &mut model,
    );
    app.update(
        Event::QueryChanged {
            query: String::new(),
        },
        &mut model,
    );

    let view = app.view(&model);
    assert_eq!(view.movies.len(), 2);
    assert!(
        view.has_search_results,
        "an empty query is not a failed search"
    );
}

#[test]
fn filter_survives_a_page_append() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();
    model.online = true;
    app.update(Event::LoadInitial, &mut model);
    app.update(
        Event::TrendingPageLoaded {
            generation: model.fetch_generation,
            page: 1,
            result: Box::new(Ok(PageResponse {
                page: 1,
                results: vec![movie(1, "The Avengers")],
                total_pages: 2,
                total_results: 2,
            })),
        },
        &mut model,
    );
    app.update(
        Event::QueryChanged {
            query: "avengers".into(),
        },
        &mut model,
    );

    app.update(Event::LoadMoreIfNeeded { visible_index: 0 }, &mut model);
    app.update(
        Event::TrendingPageLoaded {
            generation: model.fetch_generation,
            page: 2,
            result: Box::new(Ok(PageResponse {
                page: 2,
                results: vec![movie(2, "Avengers: Endgame"), movie(3, "Batman")],
                total_pages: 2,
                total_results: 3,
            })),
        },
        &mut model,
    );

    let view = app.view(&model);
    let titles: Vec<&str> = view.movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["The Avengers", "Avengers: Endgame"]);
}

proptest! {
    // The filtered list is exactly the title-matching subsequence of
    // the full list, for any list and any query.
    #[test]
    fn filtered_is_the_matching_subsequence(
        titles in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..20),
        query in "[a-zA-Z]{0,6}",
    ) {
        let mut model = Model::default();
        model.replace_movies(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| movie(i as u64 + 1, t))
                .collect(),
        );
        model.query = query.clone();
        model.refilter();

        let needle = query.to_lowercase();
        let expected: Vec<Movie> = model
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        prop_assert_eq!(&model.filtered, &expected);

        if query.is_empty() {
            prop_assert_eq!(&model.filtered, &model.movies);
            prop_assert!(model.has_search_results);
        } else {
            prop_assert_eq!(model.has_search_results, !expected.is_empty());
        }
    }
}
