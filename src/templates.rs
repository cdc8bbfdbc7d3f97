use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::models::{Film, MovieDetail};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const CATALOG_SCRIPT: &str = r#"
document.querySelectorAll('[data-like]').forEach((button) => {
  button.addEventListener('click', async () => {
    const id = button.dataset.like;
    const resp = await fetch(`/like/${id}`, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ count: 1 }),
    });
    const body = await resp.json();
    if (body.success) {
      const counter = document.getElementById(`likes-${id}`);
      counter.textContent = Number(counter.textContent) + 1;
    }
  });
});

const input = document.getElementById('query');
const list = document.getElementById('suggestions');
input.addEventListener('input', async () => {
  const resp = await fetch(`/suggest?query=${encodeURIComponent(input.value)}`);
  const body = await resp.json();
  list.replaceChildren(...body.movies.map((m) => {
    const li = document.createElement('li');
    li.textContent = m.release_date ? `${m.title} (${m.release_date.slice(0, 4)})` : m.title;
    return li;
  }));
});
"#;

/// What the detail page shows, whether it came from the store or from TMDB.
#[derive(Clone, Debug, Default)]
pub struct DetailView {
    pub title: String,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub starring: Vec<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub image: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub likes: Option<i64>,
    pub external_id: Option<u64>,
}

impl DetailView {
    pub fn from_film(film: &Film) -> Self {
        Self {
            title: film.title.clone(),
            year: Some(film.year),
            director: Some(film.director.clone()),
            starring: film.starring.clone(),
            genre: film.genre.clone(),
            language: film.language.clone(),
            image: film.image.clone(),
            likes: Some(film.likes),
            ..Default::default()
        }
    }

    pub fn from_external(detail: MovieDetail, image_base_url: &str) -> Self {
        let year = detail
            .release_date
            .as_deref()
            .and_then(|d| d.parse::<jiff::civil::Date>().ok())
            .map(|d| i32::from(d.year()));
        let genres: Vec<String> = detail
            .genres
            .into_iter()
            .map(|g| g.name)
            .filter(|name| !name.is_empty())
            .collect();
        let image = detail
            .poster_path
            .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path));

        Self {
            title: detail.title.unwrap_or_else(|| "Untitled".to_string()),
            year,
            genre: (!genres.is_empty()).then(|| genres.join(", ")),
            language: detail.original_language,
            image,
            tagline: detail.tagline.filter(|t| !t.is_empty()),
            overview: detail.overview.filter(|o| !o.is_empty()),
            external_id: detail.id,
            ..Default::default()
        }
    }
}

pub fn catalog_page(films: &[Film]) -> String {
    page(
        "Film catalog",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-5xl mx-auto px-6 py-12" {
                    h1 class="text-3xl font-bold text-gray-900" { "Film catalog" }

                    div class="mt-6 relative" {
                        input id="query" class="w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none" placeholder="Search TMDB..." autocomplete="off";
                        ul id="suggestions" class="mt-2 space-y-1 text-sm text-gray-600" {}
                    }

                    @if films.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "The catalog is empty." }
                        }
                    } @else {
                        div class="mt-10 grid gap-6 md:grid-cols-2" {
                            @for film in films {
                                (film_card(film))
                            }
                        }
                    }
                }
            }
            script { (PreEscaped(CATALOG_SCRIPT)) }
        },
    )
}

pub fn detail_page(view: &DetailView) -> String {
    page(
        &view.title,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-3xl mx-auto px-6 py-12" {
                    a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "Back to catalog" }
                    div class="mt-6 bg-white shadow rounded-lg p-8 flex gap-8" {
                        @if let Some(image) = &view.image {
                            img class="w-48 rounded" src=(image) alt=(view.title);
                        }
                        div {
                            h1 class="text-3xl font-bold text-gray-900" {
                                (view.title)
                                @if let Some(year) = view.year {
                                    span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                                }
                            }
                            @if let Some(tagline) = &view.tagline {
                                p class="mt-1 italic text-gray-500" { (tagline) }
                            }
                            dl class="mt-6 space-y-2 text-sm text-gray-700" {
                                @if let Some(director) = &view.director {
                                    (field("Director", director))
                                }
                                @if !view.starring.is_empty() {
                                    (field("Starring", &view.starring.join(", ")))
                                }
                                @if let Some(genre) = &view.genre {
                                    (field("Genre", genre))
                                }
                                @if let Some(language) = &view.language {
                                    (field("Language", language))
                                }
                                @if let Some(likes) = view.likes {
                                    (field("Likes", &likes.to_string()))
                                }
                            }
                            @if let Some(overview) = &view.overview {
                                p class="mt-6 text-gray-700" { (overview) }
                            }
                            @if let Some(id) = view.external_id {
                                a class="mt-6 inline-block text-sm text-gray-500 hover:text-gray-700" href=(format!("https://www.themoviedb.org/movie/{id}")) target="_blank" rel="noopener noreferrer" {
                                    "TMDB"
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error " (status.as_u16()) }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn film_card(film: &Film) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-4" {
            @if let Some(image) = &film.image {
                img class="w-20 rounded" src=(image) alt=(film.title);
            }
            div class="flex-1" {
                a class="text-xl font-semibold text-gray-900 hover:text-blue-700" href=(format!("/movieDetail/{}", film.id)) {
                    (film.title)
                    span class="ml-2 font-normal text-gray-500" { "(" (film.year) ")" }
                }
                p class="mt-1 text-sm text-gray-600" { (film.director) }
                @if !film.starring.is_empty() {
                    p class="mt-1 text-sm text-gray-500" { (film.starring.join(", ")) }
                }
                button class="mt-3 rounded-md bg-pink-600 px-3 py-1 text-sm font-semibold text-white hover:bg-pink-700" type="button" data-like=(film.id.0) {
                    "Like · "
                    span id=(format!("likes-{}", film.id)) { (film.likes) }
                }
            }
        }
    }
}

fn field(label: &str, value: &str) -> Markup {
    html! {
        div class="flex gap-2" {
            dt class="font-semibold" { (label) }
            dd { (value) }
        }
    }
}
