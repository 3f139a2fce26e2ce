// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::shared::error::OpsError;
use std::collections::BTreeMap;

/// Parse `--set` entries into a key/value map.
///
/// Each entry may hold several comma separated `key=value` pairs; a pair is
/// split on the first `=`. Later keys overwrite earlier ones.
pub fn parse_key_values(parameters: &[String]) -> Result<BTreeMap<String, String>, OpsError> {
    let mut key_values = BTreeMap::new();

    for param in parameters {
        for pair in param.split(',') {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(OpsError::usage("updated parameter formatter: key=value"));
            };
            key_values.insert(key.to_string(), value.to_string());
        }
    }

    Ok(key_values)
}
