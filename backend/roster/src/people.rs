use crate::SeedPerson;

const DEFAULT_PEOPLE: [&str; 48] = [
    "ALEXIA",
    "ASTRID ORIANA",
    "BELINDA SHAMIRA",
    "BIOMAYRA SHOANA",
    "CAMILA JADIYÉH",
    "GRISEL NATALY",
    "RUTH KARINA",
    "CIELO BELEN",
    "CLARIBETH ALISSON",
    "DARLEIN DAFNNE",
    "DIANA ESMERALDA",
    "EMILY JHONSU",
    "ESTHEFANNY ARIANA",
    "ESTHER",
    "FABIOLA NICOLL",
    "GLEIDY",
    "GUIOMARA BRITTANY",
    "JENNIFER LUCERO",
    "JHOSELIN DELCIELO",
    "KAROL ROSSELL",
    "KATHERINA ALEXANDRA",
    "KIARA DANIELA",
    "LEIDY ORIANA",
    "LEISLY MARINA",
    "LEISLY EVANYELIN",
    "MARIA ESTHER",
    "MARY MIRIAM",
    "MELISSA ALEXSANDRA",
    "MELISSA ROSARIO",
    "MILAGROS BRISAYDA",
    "NATALY MARIBEL",
    "NYKOLE LUCIANA",
    "OSHIN MICHELLY",
    "PEYTON STACEY",
    "RITA SARIANAROUSSE",
    "SANDY ENADINE",
    "SARA YANET",
    "SARAI MARGOTH",
    "SHERLY NICOLE",
    "SOLEDAD ROCIO",
    "GLENY YESENIA",
    "VENUS MARIADEL CIELO",
    "VERONICA",
    "YAQUELIN MARIALIZ",
    "YASMIN NATSUMI",
    "ZOE DANAEALEJANDRA",
    "MILAGROS NOEMI",
    "NUEVA",
];

/// Bundled roster. Image `pN.jpg` belongs to the Nth name and is expected
/// under the static directory.
pub fn default_roster() -> Vec<SeedPerson> {
    DEFAULT_PEOPLE
        .iter()
        .enumerate()
        .map(|(index, name)| SeedPerson {
            name: name.to_string(),
            image: format!("p{}.jpg", index + 1),
            gender: None,
        })
        .collect()
}
