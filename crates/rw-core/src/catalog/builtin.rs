use crate::geo::GeoPoint;

use super::{Region, Route};

/// `(name, lat, lng, dispersion_radius, traffic_factor, [(code, display_name)])`
type RegionRow = (
    &'static str,
    f64,
    f64,
    f64,
    f64,
    &'static [(&'static str, &'static str)],
);

const REGIONS: &[RegionRow] = &[
    (
        "São Paulo",
        -23.5505,
        -46.6333,
        2.0,
        1.5,
        &[
            ("BR-116", "Rodovia Presidente Dutra"),
            ("SP-330", "Rodovia Anhanguera"),
            ("SP-348", "Rodovia dos Bandeirantes"),
            ("SP-280", "Rodovia Castelo Branco"),
        ],
    ),
    (
        "Rio de Janeiro",
        -22.9068,
        -43.1729,
        1.5,
        1.3,
        &[
            ("BR-101", "Rodovia Rio-Santos"),
            ("BR-116", "Rodovia Presidente Dutra"),
            ("RJ-124", "Via Lagos"),
        ],
    ),
    (
        "Minas Gerais",
        -19.9167,
        -43.9345,
        2.5,
        1.2,
        &[
            ("BR-381", "Rodovia Fernão Dias"),
            ("BR-040", "Rodovia Washington Luís"),
            ("MG-010", "Linha Verde"),
        ],
    ),
    (
        "Bahia",
        -12.9714,
        -38.5014,
        3.0,
        1.1,
        &[
            ("BR-101", "Rodovia Litorânea"),
            ("BR-116", "Rodovia Santos Dumont"),
            ("BR-242", "Rodovia Centro-Oeste"),
        ],
    ),
    (
        "Paraná",
        -25.4195,
        -49.2646,
        2.0,
        1.1,
        &[
            ("BR-277", "Rodovia do Café"),
            ("BR-376", "Rodovia do Café"),
            ("PR-151", "Rodovia Transbrasiliana"),
        ],
    ),
    (
        "Rio Grande do Sul",
        -30.0346,
        -51.2177,
        2.5,
        1.1,
        &[
            ("BR-116", "Rodovia Presidente Getúlio Vargas"),
            ("BR-290", "Rodovia Osvaldo Aranha"),
            ("RS-122", "Rodovia da Serra Gaúcha"),
        ],
    ),
    (
        "Pernambuco",
        -8.0476,
        -34.877,
        1.5,
        1.0,
        &[
            ("BR-101", "Rodovia Governador Mário Covas"),
            ("BR-232", "Rodovia Luiz Gonzaga"),
            ("PE-060", "Rodovia das Praias"),
        ],
    ),
    (
        "Ceará",
        -3.7172,
        -38.5433,
        2.0,
        1.0,
        &[
            ("BR-116", "Rodovia Santos Dumont"),
            ("BR-222", "Rodovia Fortaleza-Teresina"),
            ("CE-040", "Rodovia do Sol Poente"),
        ],
    ),
    (
        "Pará",
        -1.4558,
        -48.4902,
        3.0,
        0.9,
        &[
            ("BR-316", "Rodovia Belém-Brasília"),
            ("BR-230", "Rodovia Transamazônica"),
            ("PA-150", "Rodovia Paulo Fontelles"),
        ],
    ),
    (
        "Santa Catarina",
        -27.5969,
        -48.5495,
        1.5,
        1.0,
        &[
            ("BR-101", "Rodovia Governador Mário Covas"),
            ("BR-282", "Rodovia Jorge Lacerda"),
            ("SC-401", "Rodovia José Carlos Daux"),
        ],
    ),
];

pub(super) fn regions() -> Vec<Region> {
    REGIONS
        .iter()
        .map(|&(name, lat, lng, radius, traffic, routes)| Region {
            name: name.to_string(),
            center: GeoPoint::new(lat, lng),
            dispersion_radius: radius,
            traffic_factor: traffic,
            routes: routes
                .iter()
                .map(|&(code, display)| Route {
                    code: code.to_string(),
                    display_name: display.to_string(),
                })
                .collect(),
        })
        .collect()
}
