//! The printer state machine.

use zpl_parser::{BarcodeType, Justification, Orientation, ZplFormatCommand};

use crate::barcode::{BarcodeDefaults, encode_barcode};
use crate::field_data::{CharacterSet, decode_field_data};
use crate::graphic::decode_graphic;
use crate::label::{Anchor, FieldPosition, FontSpec, Label, LabelElement, MAX_FIELD_DOTS, TextBlock};

/// Clamps a size parameter to [`MAX_FIELD_DOTS`].
fn dots(value: usize) -> usize {
    value.min(MAX_FIELD_DOTS)
}

/// State that persists until the end of the format.
#[derive(Debug, Default)]
struct LabelState {
    home_x: i32,
    home_y: i32,
    shift: i32,
    reverse: bool,
    font: FontSpec,
    barcode: BarcodeDefaults,
    charset: CharacterSet,
}

/// State of the current field, reset by `^FS`.
#[derive(Debug, Default)]
struct FieldState {
    x: i32,
    y: i32,
    anchor: Anchor,
    justification: Justification,
    font: Option<(FontSpec, Orientation)>,
    reverse: bool,
    block: Option<TextBlock>,
    hex_indicator: Option<char>,
    barcode: Option<BarcodeType>,
}

struct Interpreter {
    label: Label,
    global: LabelState,
    field: FieldState,
}

impl Interpreter {
    fn new() -> Self {
        Self {
            label: Label::default(),
            global: LabelState::default(),
            field: FieldState::default(),
        }
    }

    fn position(&self) -> FieldPosition {
        FieldPosition {
            x: self
                .field
                .x
                .saturating_add(self.global.home_x)
                .saturating_sub(self.global.shift),
            y: self.field.y.saturating_add(self.global.home_y),
            anchor: self.field.anchor,
            justification: self.field.justification,
        }
    }

    fn reverse(&self) -> bool {
        self.field.reverse || self.global.reverse
    }

    fn push(&mut self, element: LabelElement) {
        self.label.elements.push(element);
    }

    fn field_data(&mut self, data: &str) {
        let content = decode_field_data(data, self.field.hex_indicator, &self.global.charset);

        if let Some(barcode) = self.field.barcode {
            match encode_barcode(&barcode, &content, &self.global.barcode) {
                Ok(symbol) => {
                    let element = LabelElement::Barcode {
                        position: self.position(),
                        orientation: barcode.orientation(),
                        symbol,
                        reverse: self.reverse(),
                    };
                    self.push(element);
                    return;
                }
                Err(err) => {
                    tracing::warn!(data = %content, error = %err, "barcode not encodable, printing as text");
                }
            }
        }

        let (font, orientation) = self
            .field
            .font
            .unwrap_or((self.global.font, Orientation::Normal));
        let element = LabelElement::Text {
            position: self.position(),
            font,
            orientation,
            content,
            block: self.field.block,
            reverse: self.reverse(),
        };
        self.push(element);
    }

    fn execute(&mut self, command: &ZplFormatCommand) {
        match command {
            ZplFormatCommand::LabelLength(length) => self.label.height = *length,
            ZplFormatCommand::PrintWidth(width) => self.label.width = *width,
            ZplFormatCommand::LabelShift(shift) => self.global.shift = *shift,
            ZplFormatCommand::LabelHome { x, y } => {
                self.global.home_x = *x;
                self.global.home_y = *y;
            }
            ZplFormatCommand::LabelReverse(reverse) => self.global.reverse = *reverse,
            ZplFormatCommand::PrintOrientation(orientation) => {
                self.label.inverted = *orientation == Orientation::Inverted;
            }
            ZplFormatCommand::BarcodeDefaults {
                module_width,
                ratio,
                height,
            } => {
                self.global.barcode = BarcodeDefaults {
                    module_width: usize::from(*module_width),
                    ratio: *ratio,
                    height: dots(*height),
                };
            }
            ZplFormatCommand::Barcode(barcode) => self.field.barcode = Some(*barcode),
            ZplFormatCommand::ChangeFont {
                name,
                height,
                width,
            } => {
                self.global.font = FontSpec {
                    name: *name,
                    height: dots(*height),
                    width: dots(*width),
                };
            }
            ZplFormatCommand::Font {
                name,
                orientation,
                height,
                width,
            } => {
                let font = FontSpec {
                    name: *name,
                    height: dots(*height),
                    width: dots(*width),
                };
                self.field.font = Some((font, *orientation));
            }
            ZplFormatCommand::CharacterSet { num, mapping } => {
                self.global.charset = CharacterSet {
                    num: *num,
                    mapping: mapping.clone(),
                };
            }
            ZplFormatCommand::FieldOrigin {
                x,
                y,
                justification,
            } => {
                self.field.x = *x;
                self.field.y = *y;
                self.field.anchor = Anchor::Origin;
                self.field.justification = *justification;
            }
            ZplFormatCommand::FieldTypeset {
                x,
                y,
                justification,
            } => {
                self.field.x = *x;
                self.field.y = *y;
                self.field.anchor = Anchor::Typeset;
                self.field.justification = *justification;
            }
            ZplFormatCommand::FieldBlock {
                width,
                lines,
                line_spacing,
                justification,
                hanging_indent,
            } => {
                // spacing magnitude is clamped to the same range as sizes
                let spacing_limit = MAX_FIELD_DOTS as isize;
                self.field.block = Some(TextBlock {
                    width: dots(*width),
                    lines: *lines,
                    line_spacing: (*line_spacing).clamp(-spacing_limit, spacing_limit),
                    justification: *justification,
                    hanging_indent: dots(*hanging_indent),
                });
            }
            ZplFormatCommand::FieldHexIndicator { indicator } => {
                self.field.hex_indicator = Some(*indicator);
            }
            ZplFormatCommand::FieldReverse => self.field.reverse = true,
            ZplFormatCommand::FieldData(data) => self.field_data(data),
            ZplFormatCommand::FieldSeparator => self.field = FieldState::default(),
            ZplFormatCommand::GraphicField {
                compression_type,
                total_bytes,
                row_bytes,
                data,
                ..
            } => match decode_graphic(*compression_type, data, *total_bytes, *row_bytes) {
                Ok(bitmap) => {
                    let element = LabelElement::Image {
                        position: self.position(),
                        bitmap,
                        reverse: self.reverse(),
                    };
                    self.push(element);
                }
                Err(err) => tracing::warn!(error = %err, "skipping graphic field"),
            },
            ZplFormatCommand::GraphicBox {
                width,
                height,
                thickness,
                color,
                rounding,
            } => {
                let thickness = dots(*thickness).max(1);
                let element = LabelElement::Box {
                    position: self.position(),
                    width: dots(*width).max(thickness),
                    height: dots(*height).max(thickness),
                    thickness,
                    color: *color,
                    rounding: (*rounding).min(8),
                    reverse: self.reverse(),
                };
                self.push(element);
            }
            ZplFormatCommand::GraphicCircle {
                diameter,
                thickness,
                color,
            } => {
                let thickness = dots(*thickness).max(1);
                let diameter = dots(*diameter).max(thickness);
                let element = LabelElement::Ellipse {
                    position: self.position(),
                    width: diameter,
                    height: diameter,
                    thickness,
                    color: *color,
                    reverse: self.reverse(),
                };
                self.push(element);
            }
            ZplFormatCommand::GraphicEllipse {
                width,
                height,
                thickness,
                color,
            } => {
                let thickness = dots(*thickness).max(1);
                let element = LabelElement::Ellipse {
                    position: self.position(),
                    width: dots(*width).max(thickness),
                    height: dots(*height).max(thickness),
                    thickness,
                    color: *color,
                    reverse: self.reverse(),
                };
                self.push(element);
            }
            ZplFormatCommand::GraphicDiagonal {
                width,
                height,
                thickness,
                color,
                direction,
            } => {
                let element = LabelElement::Diagonal {
                    position: self.position(),
                    width: dots(*width),
                    height: dots(*height),
                    thickness: dots(*thickness).max(1),
                    color: *color,
                    direction: *direction,
                    reverse: self.reverse(),
                };
                self.push(element);
            }
            other => tracing::debug!(command = ?other, "ignoring command"),
        }
    }
}

/// Runs a parsed format through the printer state machine.
///
/// Fields that cannot be decoded are skipped and barcodes that cannot be
/// encoded are printed as text; both are logged as warnings.
pub fn interpret(commands: &[ZplFormatCommand]) -> Label {
    let mut interpreter = Interpreter::new();
    for command in commands {
        interpreter.execute(command);
    }
    tracing::debug!(
        width = interpreter.label.width,
        height = interpreter.label.height,
        elements = interpreter.label.elements.len(),
        "interpreted label"
    );
    interpreter.label
}
