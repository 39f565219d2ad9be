use indexmap::IndexMap;

/// Dictionary of PDF objects keyed by name.
///
/// Keys are the raw name bytes, leading `/` included. Insertion order is
/// preserved for deterministic output but does not take part in equality.
pub type Dict = IndexMap<Vec<u8>, PDFObject>;

/// Indirect object reference in a PDF document.
///
/// PDF objects can be referenced indirectly using object and generation numbers.
/// This is represented in PDF files as "N G R" (e.g., "5 0 R").
///
/// # Example
/// ```
/// use pdf_syntax::Ref;
///
/// let ref1 = Ref { num: 5, generation: 0 };
/// let ref2 = Ref::new(10, 0);  // Object 10, generation 0
/// assert_ne!(ref1, ref2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref {
    /// Object number
    pub num: u32,

    /// Generation number (0 for new objects, incremented for updates)
    pub generation: u32,
}

impl Ref {
    /// Create a new object reference.
    #[inline]
    pub const fn new(num: u32, generation: u32) -> Self {
        Self { num, generation }
    }

    /// Builds a reference from two integer operands, if both are in range.
    pub fn from_operands(num: i64, generation: i64) -> Option<Self> {
        Some(Self::new(
            u32::try_from(num).ok()?,
            u32::try_from(generation).ok()?,
        ))
    }
}

/// PDF object types as defined in the PDF specification.
///
/// A closed tree: children are owned by value, there are no back-references
/// and no cycles. References are carried unresolved.
#[derive(Debug, Clone, PartialEq)]
pub enum PDFObject {
    /// Null value
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value
    Integer(i64),

    /// Real value
    Real(f64),

    /// String value, from literal `(...)` or hex `<...>` syntax.
    /// Not guaranteed to be valid text.
    String(Vec<u8>),

    /// Name value as raw bytes, including its leading `/`.
    /// `#xx` escapes are already decoded; the bytes need not be UTF-8.
    Name(Vec<u8>),

    /// Array of objects, in declaration order
    Array(Vec<PDFObject>),

    /// Dictionary (key-value pairs)
    Dictionary(Dict),

    /// Stream object: parameter dictionary plus decoded payload
    Stream { dict: Dict, data: Vec<u8> },

    /// Indirect object reference (like "5 0 R")
    Ref(Ref),
}

impl PDFObject {
    /// Returns true if this object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, PDFObject::Null)
    }

    /// Returns the boolean value if this is a Boolean object.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PDFObject::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value if this is an Integer object.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PDFObject::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the numeric value of an Integer or Real object.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PDFObject::Integer(n) => Some(*n as f64),
            PDFObject::Real(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the name value (with its leading `/`) if this is a Name object.
    pub fn as_name(&self) -> Option<&[u8]> {
        match self {
            PDFObject::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the string bytes if this is a String object.
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            PDFObject::String(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the elements if this is an Array object.
    pub fn as_array(&self) -> Option<&[PDFObject]> {
        match self {
            PDFObject::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the dictionary of a Dictionary or Stream object.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            PDFObject::Dictionary(dict) | PDFObject::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Returns the reference if this is a Ref object.
    pub fn as_reference(&self) -> Option<Ref> {
        match self {
            PDFObject::Ref(r) => Some(*r),
            _ => None,
        }
    }

    /// Returns a short name for the object's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PDFObject::Null => "null",
            PDFObject::Boolean(_) => "boolean",
            PDFObject::Integer(_) => "integer",
            PDFObject::Real(_) => "real",
            PDFObject::String(_) => "string",
            PDFObject::Name(_) => "name",
            PDFObject::Array(_) => "array",
            PDFObject::Dictionary(_) => "dictionary",
            PDFObject::Stream { .. } => "stream",
            PDFObject::Ref(_) => "reference",
        }
    }
}

/// An object read together with its `N G obj` header.
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    /// Identity declared by the header
    pub reference: Ref,
    /// The wrapped object
    pub object: PDFObject,
}
