// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

//! This crate contains the methods for writing the resulting [MCA] as tab-separated text.
//!
//! The first line holds the names of the parameters, every further line one row. Values are written as their labels,
//! negative values with their prefix and undefined expected results as `?`.

#![deny(missing_docs, rustdoc::missing_crate_level_docs, future_incompatible)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use mca::MCA;
use sut::SUT;

fn write_headers<W: Write>(sut: &SUT, mca: &MCA, writer: &mut W) -> std::io::Result<()> {
    let mut columns = mca.columns.iter();
    if let Some(&first) = columns.next() {
        writer.write_all(sut.parameter(first).name().as_bytes())?;
    }
    for &parameter in columns {
        writer.write_all(b"\t")?;
        writer.write_all(sut.parameter(parameter).name().as_bytes())?;
    }
    writer.write_all(b"\n")
}

fn write_values<W: Write>(sut: &SUT, mca: &MCA, writer: &mut W) -> std::io::Result<()> {
    for row in &mca.rows {
        for (index, (&parameter, &value)) in mca.columns.iter().zip(row).enumerate() {
            if index > 0 {
                writer.write_all(b"\t")?;
            }
            writer.write_all(sut.parameter(parameter).render(value).as_bytes())?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Write the given [MCA] to the given writer.
pub fn write_result<W: Write>(sut: &SUT, mca: &MCA, mut writer: W) -> std::io::Result<()> {
    write_headers(sut, mca, &mut writer)?;
    write_values(sut, mca, &mut writer)?;
    writer.flush()
}

/// Write the given [MCA] to the given filename.
pub fn write_result_file(sut: &SUT, mca: &MCA, filename: &Path) -> std::io::Result<()> {
    info!(rows = mca.len(), file = %filename.display(), "Writing the resulting suite");
    write_result(sut, mca, BufWriter::new(File::create(filename)?))
}

#[cfg(test)]
mod test {
    use common::UNDEFINED_VALUE;
    use sut::Parameter;

    use super::*;

    fn render(sut: &SUT, mca: &MCA) -> String {
        let mut buffer = Vec::new();
        write_result(sut, mca, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_labels_and_header() {
        let mut sut = SUT::new();
        let model = sut.add_model("", 0);
        let size = sut.add_parameter(model, Parameter::with_labels("Size", vec!["10".into(), "100".into()])).unwrap();
        let kind = sut.add_parameter(
            model,
            Parameter::with_labels("Type", vec!["Primary".into(), "Bogus".into()]).with_negative(&[1]),
        ).unwrap();
        let mca = MCA::new(vec![size, kind], vec![vec![0, 0], vec![1, 1]]);
        assert_eq!("Size\tType\n10\tPrimary\n100\t~Bogus\n", render(&sut, &mca));
    }

    #[test]
    fn test_undefined_result() {
        let mut sut = SUT::new();
        let model = sut.add_model("", 0);
        let result = sut.add_parameter(
            model,
            Parameter::with_labels("Result", vec!["pass".into(), "fail".into()]).as_expected_result(),
        ).unwrap();
        let mca = MCA::new(vec![result], vec![vec![UNDEFINED_VALUE], vec![1]]);
        assert_eq!("Result\n?\nfail\n", render(&sut, &mca));
    }

    #[test]
    fn test_empty() {
        let sut = SUT::new();
        assert_eq!("\n", render(&sut, &MCA::default()));
    }
}
