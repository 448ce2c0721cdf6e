pub mod catalog {

    pub const NEW_RELEASE_WINDOW_DAYS: i64 = 21;

    pub const CLASSIC_AGE_YEARS: i32 = 25;

    pub const ALLOWED_RATINGS: &[&str] = &[
        "G", "PG", "PG-13", "R", "NC-17", "TE", "T", "+13", "+16", "+18",
    ];

    /// Categories inserted by `seed`, as (name, description).
    pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
        ("Terror", "Películas de terror y suspense psicológico"),
        ("Suspenso", "Películas de suspenso y thriller psicológico"),
        ("Drama", "Películas dramáticas que exploran emociones profundas"),
        ("Comedia", "Películas cómicas y de entretenimiento ligero"),
    ];
}

pub mod limits {

    pub const DEFAULT_PAGE: u64 = 1;

    pub const DEFAULT_PAGE_SIZE: u64 = 10;

    pub const MAX_PAGE_SIZE: u64 = 100;

    pub const MAX_MOVIE_DURATION_MINUTES: i32 = 600;
}
