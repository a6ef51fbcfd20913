use super::{VehicleCatalog, VehicleMake, VehicleModel, VehicleType, YearRange};

const TYPES: &[(&str, &str)] = &[
    ("sedan", "Sedan"),
    ("suv", "SUV"),
    ("truck", "Truck"),
    ("van", "Van"),
    ("coupe", "Coupe"),
    ("wagon", "Wagon"),
    ("hatchback", "Hatchback"),
    ("convertible", "Convertible"),
    ("luxury", "Luxury"),
];

const MAKES: &[(&str, &str, &[&str])] = &[
    ("chevrolet", "Chevrolet", &["sedan", "suv", "truck", "van"]),
    ("ford", "Ford", &["sedan", "suv", "truck", "van"]),
    ("dodge", "Dodge", &["sedan", "suv", "truck", "van"]),
    ("ram", "RAM", &["truck", "van"]),
    ("jeep", "Jeep", &["suv"]),
    ("gmc", "GMC", &["suv", "truck"]),
    ("toyota", "Toyota", &["sedan", "suv", "truck", "van", "hatchback"]),
    ("honda", "Honda", &["sedan", "suv", "van", "hatchback"]),
    ("nissan", "Nissan", &["sedan", "suv", "truck", "van"]),
    ("mazda", "Mazda", &["sedan", "suv", "hatchback"]),
    ("subaru", "Subaru", &["sedan", "suv", "wagon"]),
    ("volkswagen", "Volkswagen", &["sedan", "suv", "wagon", "hatchback"]),
    ("bmw", "BMW", &["sedan", "suv", "coupe", "convertible", "luxury"]),
    (
        "mercedes",
        "Mercedes-Benz",
        &["sedan", "suv", "coupe", "convertible", "luxury", "van"],
    ),
    ("audi", "Audi", &["sedan", "suv", "coupe", "luxury"]),
    ("hyundai", "Hyundai", &["sedan", "suv", "hatchback"]),
    ("kia", "Kia", &["sedan", "suv", "van", "hatchback"]),
];

// (id, name, make, types, first year, last year; None while in production)
const MODELS: &[(&str, &str, &str, &[&str], i32, Option<i32>)] = &[
    ("silverado", "Silverado", "chevrolet", &["truck"], 1999, None),
    ("colorado", "Colorado", "chevrolet", &["truck"], 2004, None),
    ("malibu", "Malibu", "chevrolet", &["sedan"], 1997, Some(2024)),
    ("equinox", "Equinox", "chevrolet", &["suv"], 2005, None),
    ("f150", "F-150", "ford", &["truck"], 1990, None),
    ("ranger", "Ranger", "ford", &["truck"], 1990, None),
    ("explorer", "Explorer", "ford", &["suv"], 1991, None),
    ("escape", "Escape", "ford", &["suv"], 2001, None),
    ("camry", "Camry", "toyota", &["sedan"], 1990, None),
    ("corolla", "Corolla", "toyota", &["sedan", "hatchback"], 1990, None),
    ("rav4", "RAV4", "toyota", &["suv"], 1996, None),
    ("tacoma", "Tacoma", "toyota", &["truck"], 1995, None),
    ("civic", "Civic", "honda", &["sedan", "hatchback"], 1990, None),
    ("accord", "Accord", "honda", &["sedan"], 1990, None),
    ("cr-v", "CR-V", "honda", &["suv"], 1997, None),
    ("pilot", "Pilot", "honda", &["suv"], 2003, None),
];

fn type_set(ids: &[&str]) -> std::collections::BTreeSet<String> {
    ids.iter().map(|id| (*id).to_string()).collect()
}

pub(super) fn catalog() -> VehicleCatalog {
    let types = TYPES
        .iter()
        .map(|(id, name)| VehicleType {
            id: (*id).to_string(),
            name: (*name).to_string(),
        })
        .collect();

    let makes = MAKES
        .iter()
        .map(|(id, name, types)| VehicleMake {
            id: (*id).to_string(),
            name: (*name).to_string(),
            supported_types: type_set(types),
        })
        .collect();

    let models = MODELS
        .iter()
        .map(|(id, name, make_id, types, start, end)| VehicleModel {
            id: (*id).to_string(),
            name: (*name).to_string(),
            make_id: (*make_id).to_string(),
            supported_types: type_set(types),
            years: YearRange {
                start: *start,
                end: *end,
            },
        })
        .collect();

    VehicleCatalog::from_parts(types, makes, models)
}
