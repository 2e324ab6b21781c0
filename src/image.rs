use crate::Size;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Width of the image
    pub width: usize,
    /// Height of the image
    pub height: usize,
    /// How many elements we need to skip to get to the next row.
    pub row_stride: usize,
    /// How many elements we need to skip to get to the next column.
    pub col_stride: usize,
}

impl Shape {
    /// Shape of a densely packed row-major image
    pub fn packed(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            row_stride: size.width,
            col_stride: 1,
        }
    }

    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        row * self.row_stride + col * self.col_stride
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Minimal length of the data slice that can back this shape
    pub fn data_len(&self) -> usize {
        if self.width == 0 || self.height == 0 {
            0
        } else {
            self.offset(self.height - 1, self.width - 1) + 1
        }
    }
}

pub trait Image {
    type Pixel;

    fn data(&self) -> &[Self::Pixel];

    fn shape(&self) -> Shape;

    fn width(&self) -> usize {
        self.shape().width
    }

    fn height(&self) -> usize {
        self.shape().height
    }

    fn size(&self) -> Size {
        self.shape().size()
    }

    fn get(&self, row: usize, col: usize) -> Option<&Self::Pixel> {
        let shape = self.shape();
        if row >= shape.height || col >= shape.width {
            return None;
        }
        self.data().get(shape.offset(row, col))
    }

    fn as_ref(&self) -> ImageRef<'_, Self::Pixel> {
        ImageRef {
            shape: self.shape(),
            data: self.data(),
        }
    }
}

pub trait ImageMut: Image {
    fn data_mut(&mut self) -> &mut [Self::Pixel];

    fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Self::Pixel> {
        let shape = self.shape();
        if row >= shape.height || col >= shape.width {
            return None;
        }
        self.data_mut().get_mut(shape.offset(row, col))
    }

    fn as_mut(&mut self) -> ImageMutRef<'_, Self::Pixel> {
        ImageMutRef {
            shape: self.shape(),
            data: self.data_mut(),
        }
    }

    fn fill(&mut self, value: Self::Pixel)
    where
        Self::Pixel: Clone,
    {
        let shape = self.shape();
        let data = self.data_mut();
        for row in 0..shape.height {
            for col in 0..shape.width {
                data[shape.offset(row, col)] = value.clone();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOwned<P> {
    shape: Shape,
    data: Vec<P>,
}

impl<P> ImageOwned<P> {
    /// Wrap data into an image, returns `None` if data is too short for the shape
    pub fn new(shape: Shape, data: Vec<P>) -> Option<Self> {
        (data.len() >= shape.data_len()).then_some(Self { shape, data })
    }

    pub fn new_default(size: Size) -> Self
    where
        P: Default,
    {
        Self::new_with(size, |_, _| Default::default())
    }

    pub fn new_with<F>(size: Size, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> P,
    {
        let mut data = Vec::with_capacity(size.height * size.width);
        for row in 0..size.height {
            for col in 0..size.width {
                data.push(f(row, col))
            }
        }
        Self {
            shape: Shape::packed(size),
            data,
        }
    }
}

impl<P> Image for ImageOwned<P> {
    type Pixel = P;

    fn shape(&self) -> Shape {
        self.shape
    }

    fn data(&self) -> &[Self::Pixel] {
        &self.data
    }
}

impl<C> ImageMut for ImageOwned<C> {
    fn data_mut(&mut self) -> &mut [Self::Pixel] {
        &mut self.data
    }
}

#[derive(Debug, Clone)]
pub struct ImageRef<'a, P> {
    shape: Shape,
    data: &'a [P],
}

impl<'a, P> ImageRef<'a, P> {
    /// Borrow data as an image, returns `None` if data is too short for the shape
    pub fn new(shape: Shape, data: &'a [P]) -> Option<Self> {
        (data.len() >= shape.data_len()).then_some(Self { shape, data })
    }
}

impl<P> Image for ImageRef<'_, P> {
    type Pixel = P;

    fn shape(&self) -> Shape {
        self.shape
    }

    fn data(&self) -> &[Self::Pixel] {
        self.data
    }
}

#[derive(Debug)]
pub struct ImageMutRef<'a, C> {
    shape: Shape,
    data: &'a mut [C],
}

impl<'a, P> ImageMutRef<'a, P> {
    /// Borrow data as a mutable image, returns `None` if data is too short for the shape
    pub fn new(shape: Shape, data: &'a mut [P]) -> Option<Self> {
        if data.len() >= shape.data_len() {
            Some(Self { shape, data })
        } else {
            None
        }
    }
}

impl<P> Image for ImageMutRef<'_, P> {
    type Pixel = P;

    fn shape(&self) -> Shape {
        self.shape
    }

    fn data(&self) -> &[Self::Pixel] {
        self.data
    }
}

impl<P> ImageMut for ImageMutRef<'_, P> {
    fn data_mut(&mut self) -> &mut [Self::Pixel] {
        self.data
    }
}

impl<I> Image for &I
where
    I: Image + ?Sized,
{
    type Pixel = I::Pixel;

    fn shape(&self) -> Shape {
        (*self).shape()
    }

    fn data(&self) -> &[Self::Pixel] {
        (*self).data()
    }
}

impl<I> Image for &mut I
where
    I: Image + ?Sized,
{
    type Pixel = I::Pixel;

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn data(&self) -> &[Self::Pixel] {
        (**self).data()
    }
}

impl<I> ImageMut for &mut I
where
    I: ImageMut + ?Sized,
{
    fn data_mut(&mut self) -> &mut [Self::Pixel] {
        (**self).data_mut()
    }
}

impl<P> Image for Arc<dyn Image<Pixel = P>> {
    type Pixel = P;

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn data(&self) -> &[Self::Pixel] {
        (**self).data()
    }
}
