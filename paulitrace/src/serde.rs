use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::generator::StabilizerGenerator;
use crate::tableau::StabilizerTableau;

impl Serialize for StabilizerGenerator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StabilizerGenerator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct TableauRepr {
    qubit_count: usize,
    generators: Vec<StabilizerGenerator>,
}

impl Serialize for StabilizerTableau {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TableauRepr {
            qubit_count: self.qubit_count(),
            generators: self.generators().to_vec(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StabilizerTableau {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = TableauRepr::deserialize(deserializer)?;
        StabilizerTableau::with_qubit_count(repr.qubit_count, repr.generators).map_err(de::Error::custom)
    }
}
