use std::fs;
use std::path::Path;

use crate::error::{CorpusError, Result};
use crate::filename::{parse_date, parse_page_id};
use crate::record::{BlockRecord, Line, PageDocument};

use super::tree::Element;

const FILE_NAME_PATH: &[&str] = &["Description", "sourceImageInformation", "fileName"];
const PRINT_SPACE_PATH: &[&str] = &["Layout", "Page", "PrintSpace"];

/// Read and extract one `.alto.xml` page file.
pub fn extract_file(path: &Path) -> Result<PageDocument> {
    let xml = fs::read_to_string(path).map_err(|source| CorpusError::StorageRead {
        path: path.to_path_buf(),
        source,
    })?;
    let root = Element::parse(&xml)
        .map_err(|source| CorpusError::Xml {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| missing("alto", path))?;
    extract_page(&root, path)
}

/// Turn a parsed page into its block records, in reading order.
///
/// A page without text blocks yields no records; a block without lines yields a
/// record with empty content. The source image name is mandatory, and both the
/// date and the page id must be recoverable from it.
pub fn extract_page(root: &Element, path: &Path) -> Result<PageDocument> {
    if root.name != "alto" {
        return Err(missing("alto", path));
    }

    let file_name = root
        .find(FILE_NAME_PATH)
        .map(|el| el.text.trim())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| missing("Description/sourceImageInformation/fileName", path))?;

    let date = parse_date(file_name)?;
    let page_id = parse_page_id(file_name)?;

    let Some(print_space) = root.find(PRINT_SPACE_PATH) else {
        return Ok(Vec::new());
    };

    print_space
        .children_named("TextBlock")
        .map(|block| {
            Ok(BlockRecord {
                date,
                page_id: page_id.clone(),
                source_img: file_name.to_string(),
                content: block_lines(block, path)?,
            })
        })
        .collect()
}

fn block_lines(block: &Element, path: &Path) -> Result<Vec<Line>> {
    block
        .children_named("TextLine")
        .map(|line| line_tokens(line, path))
        .collect()
}

fn line_tokens(line: &Element, path: &Path) -> Result<Line> {
    if line.child("String").is_none() {
        return Err(missing("TextLine/String", path));
    }
    line.children_named("String")
        .map(|s| {
            s.attr("CONTENT")
                .map(str::to_string)
                .ok_or_else(|| missing("String/@CONTENT", path))
        })
        .collect()
}

fn missing(field: &'static str, path: &Path) -> CorpusError {
    CorpusError::MissingRequiredField {
        field,
        path: path.to_path_buf(),
    }
}
