//! JSON wire format for events.
//!
//! Records are self-describing objects keyed by `kind`:
//!
//! ```text
//! {"kind":"Block","session":"s1"}
//! {"kind":"Invoke","session":"s1","stmt":{"sql":"...","flags":0}}
//! {"kind":"Return","session":"s1","stmt":{...},"t":[start,end],"result":"<base64>","data":[[...]]}
//! {"kind":"Return","session":"s1","stmt":{...},"t":[start,end],"error":{"code":1062,"message":"..."}}
//! ```
//!
//! `result` is the result set's own binary encoding in base64 and is the
//! authoritative payload. `data` is a readable projection of the same rows,
//! written for row-bearing results only and ignored on decode.

use crate::{Error, Event, EventMeta, Invoke, Kind, Outcome, Payload, Result, Return, SqlError, Stmt};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use resultset::ResultData;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Record {
    kind: Kind,
    session: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stmt: Option<Stmt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    t: Option<Vec<i64>>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    data: Option<Vec<Vec<Option<String>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<SqlError>,
}

impl Record {
    fn meta(kind: Kind, session: &str) -> Self {
        Self {
            kind,
            session: session.to_string(),
            stmt: None,
            t: None,
            data: None,
            result: None,
            error: None,
        }
    }
}

impl<R: ResultData> Event<R> {
    /// Encode the event as a single-line JSON record.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_record()?)?)
    }

    /// Decode a JSON record produced by [`Event::encode`].
    pub fn decode(json: &str) -> Result<Self> {
        Self::from_record(serde_json::from_str(json)?)
    }

    pub(crate) fn to_record(&self) -> Result<Record> {
        self.validate()?;
        let mut record = Record::meta(self.kind(), self.session());
        match self.payload() {
            Payload::None => {}
            Payload::Invoke(inv) => record.stmt = Some(inv.stmt.clone()),
            Payload::Return(ret) => {
                record.stmt = Some(ret.stmt.clone());
                record.t = Some(vec![unix_nanos(ret.t[0])?, unix_nanos(ret.t[1])?]);
                match &ret.outcome {
                    Outcome::Error(err) => record.error = Some(err.clone()),
                    Outcome::Result(res) => {
                        let raw = res
                            .encode()
                            .map_err(|e| Error::ResultSet(Box::new(e)))?;
                        record.result = Some(STANDARD.encode(raw));
                        if !res.is_exec_result() {
                            record.data = Some(project_rows(res));
                        }
                    }
                }
            }
        }
        Ok(record)
    }

    pub(crate) fn from_record(record: Record) -> Result<Self> {
        let meta = EventMeta::new(record.kind, record.session);
        let payload = match meta.kind {
            Kind::Block | Kind::Resume => Payload::None,
            Kind::Invoke => Payload::Invoke(Invoke {
                sess: meta.session.clone(),
                stmt: record.stmt.unwrap_or_default(),
            }),
            Kind::Return => {
                let stmt = record.stmt.unwrap_or_default();
                let nanos = record.t.unwrap_or_default();
                let t = [timestamp(nanos.first()), timestamp(nanos.get(1))];
                let outcome = match (record.error, record.result) {
                    (Some(err), _) => Outcome::Error(err),
                    (None, Some(encoded)) => {
                        let raw = STANDARD.decode(encoded)?;
                        let res = R::decode(&raw).map_err(|e| Error::ResultSet(Box::new(e)))?;
                        Outcome::Result(res)
                    }
                    (None, None) => return Err(Error::MissingOutcome),
                };
                Payload::Return(Return { stmt, t, outcome })
            }
        };
        Ok(Self::from_parts(meta, payload))
    }
}

impl<R: ResultData> Serialize for Event<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<'de, R: ResultData> Deserialize<'de> for Event<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = Record::deserialize(deserializer)?;
        Self::from_record(record).map_err(<D::Error as serde::de::Error>::custom)
    }
}

fn unix_nanos(t: DateTime<Utc>) -> Result<i64> {
    t.timestamp_nanos_opt().ok_or(Error::TimestampOutOfRange(t))
}

// Missing entries decode to the Unix epoch, the zero of the nanosecond encoding.
fn timestamp(nanos: Option<&i64>) -> DateTime<Utc> {
    nanos
        .map(|&n| DateTime::from_timestamp_nanos(n))
        .unwrap_or_default()
}

fn project_rows<R: ResultData>(res: &R) -> Vec<Vec<Option<String>>> {
    (0..res.n_rows())
        .map(|i| {
            (0..res.n_cols())
                .map(|j| {
                    res.raw_value(i, j)
                        .map(|raw| String::from_utf8_lossy(raw).into_owned())
                })
                .collect()
        })
        .collect()
}
