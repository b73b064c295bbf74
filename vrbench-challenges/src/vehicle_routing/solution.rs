use super::{check_time_budget, Challenge, Routes, SolveFn};
use crate::ChallengeError;
use anyhow::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::time::Instant;
use tracing::debug;
use vrbench_utils::{Int32Reader, Int32Writer};

/// Routes plus the identifier stream recorded while producing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub routes: Routes,
    // little-endian i32s, 4 bytes per emitted identifier
    pub state_updates: Vec<u8>,
}

impl Solution {
    pub fn new(routes: Routes, state_updates: Vec<u8>) -> Self {
        Self {
            routes,
            state_updates,
        }
    }

    /// Binary layout, all integers little-endian i32:
    /// `n_routes, (n_nodes, node * n_nodes) * n_routes, n_bytes, byte * n_bytes`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Int32Writer::new();
        writer.write_i32(self.routes.len() as i32);
        for route in &self.routes {
            writer.write_i32(route.len() as i32);
            for &node in route {
                writer.write_i32(node as i32);
            }
        }
        writer.write_i32(self.state_updates.len() as i32);
        writer.write_bytes(&self.state_updates);
        writer.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Int32Reader::new(bytes);
        let num_routes = read_len(&mut reader, "number of routes")?;
        let mut routes = Vec::with_capacity(num_routes.min(reader.remaining() / 4));
        for _ in 0..num_routes {
            let num_nodes = read_len(&mut reader, "number of nodes")?;
            let mut route = Vec::with_capacity(num_nodes.min(reader.remaining() / 4));
            for _ in 0..num_nodes {
                let node = reader.read_i32()?;
                if node < 0 {
                    return Err(invalid_encoding(format!("negative node index '{}'", node)));
                }
                route.push(node as usize);
            }
            routes.push(route);
        }
        let num_bytes = read_len(&mut reader, "length of state updates")?;
        let state_updates = reader.read_bytes(num_bytes)?.to_vec();
        if !reader.is_exhausted() {
            return Err(invalid_encoding(format!(
                "{} trailing bytes",
                reader.remaining()
            )));
        }
        Ok(Self {
            routes,
            state_updates,
        })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| invalid_encoding(format!("base64 decode failed: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn num_identifiers(&self) -> usize {
        self.state_updates.len() / 4
    }

    pub fn verify_solution_only(&self, challenge: &Challenge) -> bool {
        challenge.is_challenge_solution(&self.routes)
    }

    /// Re-runs `algorithm` against `challenge` and checks that it emits the
    /// recorded identifier stream exactly, with no bytes left over.
    ///
    /// A mismatch yields `Ok(false)`; a timeout or any other failure is
    /// returned as an error.
    pub fn verify_method_only(
        &self,
        challenge: &Challenge,
        algorithm: SolveFn,
        max_seconds: Option<f64>,
    ) -> Result<bool> {
        let start = Instant::now();
        let mut reader = Int32Reader::new(&self.state_updates);
        let mut check_identifier = |identifier: i32| -> Result<()> {
            check_time_budget(start, max_seconds)?;
            let position = reader.position();
            match reader.next_i32() {
                Some(recorded) if recorded == identifier => Ok(()),
                recorded => Err(ChallengeError::MismatchedAlgorithm {
                    position,
                    expected: recorded,
                    actual: identifier,
                }
                .into()),
            }
        };

        match challenge.run_solver(algorithm, &mut check_identifier, false) {
            Ok(_) => {
                let exhausted = reader.is_exhausted();
                if !exhausted {
                    debug!(
                        "replay left {} unread bytes of state updates",
                        reader.remaining()
                    );
                }
                Ok(exhausted)
            }
            Err(e) => match e.downcast_ref::<ChallengeError>() {
                Some(mismatch @ ChallengeError::MismatchedAlgorithm { .. }) => {
                    debug!("{}", mismatch);
                    Ok(false)
                }
                _ => Err(e),
            },
        }
    }

    pub fn verify_solution_and_method(
        &self,
        challenge: &Challenge,
        algorithm: SolveFn,
        max_seconds: Option<f64>,
    ) -> Result<bool> {
        Ok(self.verify_solution_only(challenge)
            && self.verify_method_only(challenge, algorithm, max_seconds)?)
    }
}

fn invalid_encoding(reason: String) -> anyhow::Error {
    ChallengeError::InvalidEncoding { reason }.into()
}

fn read_len(reader: &mut Int32Reader, what: &str) -> Result<usize> {
    let len = reader.read_i32()?;
    if len < 0 {
        return Err(invalid_encoding(format!("negative {} '{}'", what, len)));
    }
    Ok(len as usize)
}

impl serde::Serialize for Solution {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> serde::Deserialize<'de> for Solution {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::fmt;

        struct VisitorImpl;

        impl<'de> serde::de::Visitor<'de> for VisitorImpl {
            type Value = Solution;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a base64 encoded Solution")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Solution::from_base64(v).map_err(|e| E::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(VisitorImpl)
    }
}
